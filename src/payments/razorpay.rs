use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{Buyer, PaymentSummary};
use crate::util::{minor_to_major, non_empty};

/// The only event that triggers registration.
pub const PAYMENT_CAPTURED: &str = "payment.captured";

const DEFAULT_NAME: &str = "Customer";
const DEFAULT_GENDER: &str = "Male";

/// Envelope of a Razorpay webhook delivery.
#[derive(Debug, Deserialize)]
pub struct RazorpayWebhookEvent {
    pub event: String,
    pub payload: RazorpayEventPayload,
}

#[derive(Debug, Deserialize)]
pub struct RazorpayEventPayload {
    pub payment: RazorpayPaymentWrapper,
}

#[derive(Debug, Deserialize)]
pub struct RazorpayPaymentWrapper {
    pub entity: RazorpayPaymentEntity,
}

#[derive(Debug, Deserialize)]
pub struct RazorpayPaymentEntity {
    pub id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub method: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    /// Either an object (one buyer) or an array of objects (several buyers).
    #[serde(default)]
    pub notes: Option<Value>,
}

/// Peek at the event name without committing to the full payload shape.
///
/// Returns `None` for bodies that are not JSON objects or carry no string `event`.
pub fn event_name(body: &Value) -> Option<&str> {
    body.as_object()?.get("event")?.as_str()
}

/// Decode a captured-payment delivery into its typed form.
pub fn parse_captured_event(body: Value) -> Result<RazorpayWebhookEvent> {
    serde_json::from_value(body)
        .map_err(|e| AppError::InvalidPayload(format!("payment entity: {}", e)))
}

/// The two shapes `notes` can take.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentNotes {
    Single(Map<String, Value>),
    Multiple(Vec<Value>),
}

impl PaymentNotes {
    /// Razorpay encodes empty notes as `[]`; that is treated the same as absent notes.
    pub fn from_value(notes: Option<&Value>) -> Self {
        match notes {
            Some(Value::Array(items)) if !items.is_empty() => PaymentNotes::Multiple(items.clone()),
            Some(Value::Object(map)) => PaymentNotes::Single(map.clone()),
            Some(Value::Array(_)) | Some(Value::Null) | None => PaymentNotes::Single(Map::new()),
            Some(other) => {
                tracing::warn!(notes = %other, "Unexpected notes shape, ignoring");
                PaymentNotes::Single(Map::new())
            }
        }
    }
}

/// A payment reduced to its shared facts and the buyers it pays for.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPayment {
    pub payment: PaymentSummary,
    pub buyers: Vec<Buyer>,
    pub multi_user: bool,
}

/// Read a note field as a string; numbers are accepted, blanks are absent.
fn note_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match map.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    non_empty(Some(value))
}

/// Extract the canonical payment summary and one [`Buyer`] per user.
pub fn normalize(entity: &RazorpayPaymentEntity, placeholder_email: &str) -> NormalizedPayment {
    let description = non_empty(entity.description.clone()).unwrap_or_default();
    let entity_email = non_empty(entity.email.clone());
    let contact = non_empty(entity.contact.clone());

    let payment = PaymentSummary {
        payment_id: entity.id.clone(),
        order_id: non_empty(entity.order_id.clone()).unwrap_or_default(),
        amount: minor_to_major(entity.amount),
        method: entity.method.clone().unwrap_or_default().to_uppercase(),
        contact: contact.clone(),
        description: description.clone(),
    };

    match PaymentNotes::from_value(entity.notes.as_ref()) {
        PaymentNotes::Multiple(items) => {
            let buyers = items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match item.as_object() {
                    Some(map) => Some(buyer_from_list_entry(
                        map,
                        entity_email.as_deref(),
                        &description,
                        placeholder_email,
                    )),
                    None => {
                        tracing::warn!(index, "Skipping non-object entry in notes list");
                        None
                    }
                })
                .collect();

            NormalizedPayment {
                payment,
                buyers,
                multi_user: true,
            }
        }
        PaymentNotes::Single(map) => {
            let login_email = entity_email
                .or_else(|| note_str(&map, "user_email"))
                .unwrap_or_else(|| placeholder_email.to_string());
            let buyer = Buyer {
                name: note_str(&map, "name")
                    .or(contact)
                    .unwrap_or_else(|| DEFAULT_NAME.to_string()),
                notification_email: note_str(&map, "user_email")
                    .unwrap_or_else(|| login_email.clone()),
                login_email,
                gender: note_str(&map, "gender").unwrap_or_else(|| DEFAULT_GENDER.to_string()),
                product_name: note_str(&map, "product_name").unwrap_or_else(|| description.clone()),
                product_type: note_str(&map, "product_type")
                    .unwrap_or_default()
                    .to_lowercase(),
                product_id: note_str(&map, "product_id"),
            };

            NormalizedPayment {
                payment,
                buyers: vec![buyer],
                multi_user: false,
            }
        }
    }
}

fn buyer_from_list_entry(
    map: &Map<String, Value>,
    entity_email: Option<&str>,
    description: &str,
    placeholder_email: &str,
) -> Buyer {
    let login_email = note_str(map, "email")
        .or_else(|| entity_email.map(str::to_string))
        .unwrap_or_else(|| placeholder_email.to_string());

    Buyer {
        name: note_str(map, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
        notification_email: note_str(map, "user_email").unwrap_or_else(|| login_email.clone()),
        login_email,
        gender: note_str(map, "gender").unwrap_or_else(|| DEFAULT_GENDER.to_string()),
        product_name: note_str(map, "product_name").unwrap_or_else(|| description.to_string()),
        product_type: note_str(map, "product_type")
            .unwrap_or_default()
            .to_lowercase(),
        product_id: note_str(map, "product_id"),
    }
}
