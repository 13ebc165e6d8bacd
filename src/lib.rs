//! Enrollhook - payment webhook to assessment registration
//!
//! Receives captured-payment notifications, works out which assessment was
//! bought, registers the buyer with the matching provider and emails them
//! their access link and a generated password.

pub mod classifier;
pub mod config;
pub mod crypto;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payments;
pub mod providers;
pub mod state;
pub mod util;
