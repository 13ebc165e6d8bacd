pub mod common;
pub mod razorpay;

pub use razorpay::handle_razorpay_webhook;

use axum::{routing::post, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/razorpay-webhook", post(handle_razorpay_webhook))
}
