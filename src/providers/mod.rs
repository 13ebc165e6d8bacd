//! Assessment provider registration.

mod registrar;

pub use registrar::*;
