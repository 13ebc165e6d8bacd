use axum::{body::Bytes, extract::State, http::StatusCode};
use serde_json::Value;

use crate::error::Result;
use crate::payments::razorpay::{event_name, parse_captured_event};
use crate::payments::{normalize, PAYMENT_CAPTURED};
use crate::state::AppState;
use crate::util::{format_money, truncate};

use super::common::process_payment;

/// Characters of the raw delivery kept in debug logs.
const LOGGED_PAYLOAD_CHARS: usize = 800;

/// `POST /razorpay-webhook`
///
/// Always acknowledges a recognized delivery with 200, whatever happens to the
/// registrations behind it, so the processor never starts retrying. Only a
/// body that cannot be decoded yields a 500.
pub async fn handle_razorpay_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, &'static str)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok((StatusCode::OK, "Event ignored"));
    }

    let value: Value = serde_json::from_slice(&body)?;

    match event_name(&value) {
        Some(PAYMENT_CAPTURED) => {}
        other => {
            tracing::debug!(event = ?other, "Ignoring webhook event");
            return Ok((StatusCode::OK, "Event ignored"));
        }
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        let raw = serde_json::to_string_pretty(&value).unwrap_or_default();
        tracing::debug!(
            payload = %truncate(&raw, LOGGED_PAYLOAD_CHARS),
            "Raw payment payload"
        );
    }

    let event = parse_captured_event(value)?;
    let normalized = normalize(&event.payload.payment.entity, &state.placeholder_email);
    let payment = &normalized.payment;

    tracing::info!(
        amount = %format_money(&state.currency_symbol, payment.amount),
        payment_id = %payment.payment_id,
        order_id = %payment.order_id,
        phone = payment.contact.as_deref().unwrap_or("-"),
        method = %payment.method,
        description = %payment.description,
        users = normalized.buyers.len(),
        "Payment captured"
    );

    let outcomes = process_payment(&state, &normalized).await;
    let registered = outcomes.iter().filter(|o| o.is_registered()).count();

    tracing::info!(
        payment_id = %payment.payment_id,
        registered,
        failed = outcomes.len() - registered,
        "Payment processed"
    );

    Ok((StatusCode::OK, "OK"))
}
