//! One-time credentials handed to buyers in the access email.
//!
//! Passwords are generated from the OS CSPRNG and never stored.

use rand::rngs::OsRng;
use rand::Rng;

/// Password length in characters.
pub const PASSWORD_LENGTH: usize = 12;

/// Letters, digits and a small fixed symbol set.
pub const PASSWORD_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Generate a 12-character password, each character drawn uniformly from
/// [`PASSWORD_ALPHABET`].
pub fn generate_password() -> String {
    let mut rng = OsRng;
    (0..PASSWORD_LENGTH)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}
