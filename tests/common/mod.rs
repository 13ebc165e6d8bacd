//! Test utilities and fixtures for enrollhook integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

pub use enrollhook::classifier::ClassifierStrategy;
pub use enrollhook::config::{Config, MailConfig, ProviderConfig};
pub use enrollhook::handlers;
pub use enrollhook::models::{ProductCatalog, ProductMapping};
pub use enrollhook::state::AppState;

pub const PLACEHOLDER_EMAIL: &str = "no-email@example.com";
pub const MAIL_API_KEY: &str = "re_test_key";

type Responder = dyn Fn(&Value) -> (StatusCode, String) + Send + Sync;

/// One request captured by a [`MockServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Arc<Responder>,
    delay: Duration,
}

async fn record(
    State(mock): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let reply = (mock.responder)(&value);
    mock.requests
        .lock()
        .unwrap()
        .push(RecordedRequest { headers, body: value });
    if !mock.delay.is_zero() {
        tokio::time::sleep(mock.delay).await;
    }
    reply
}

/// A local HTTP server standing in for an assessment provider or the mail relay.
/// Every POST is recorded and answered by the responder.
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> (StatusCode, String) + Send + Sync + 'static,
    {
        Self::start_with_delay(responder, Duration::ZERO).await
    }

    pub async fn start_with_delay<F>(responder: F, delay: Duration) -> Self
    where
        F: Fn(&Value) -> (StatusCode, String) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            responder: Arc::new(responder),
            delay,
        };
        let app = Router::new().route("/", post(record)).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Mock server has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        Self {
            url: format!("http://{}/", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Provider reply for a successful registration.
pub fn provider_success(link: &str) -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({
            "success": true,
            "respondentDetails": [{"link": link, "respondentId": 1001}]
        })
        .to_string(),
    )
}

/// Provider reply for a rejected registration.
pub fn provider_rejection(message: &str) -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({"success": false, "errorMessage": message}).to_string(),
    )
}

/// Mail relay reply for an accepted message.
pub fn mail_accepted(_: &Value) -> (StatusCode, String) {
    (StatusCode::OK, json!({"id": "email_test_1"}).to_string())
}

/// Email address of the (single) respondent in a provider request.
pub fn respondent_email(body: &Value) -> &str {
    body["respondentDetails"][0]["eMailAddress"]
        .as_str()
        .unwrap_or_default()
}

/// Build a config pointing at local mock servers.
pub fn test_config(
    disc: ProviderConfig,
    harrason: ProviderConfig,
    mail_url: &str,
    strategy: ClassifierStrategy,
) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        disc,
        harrason,
        provider_timeout: Duration::from_secs(5),
        mail: MailConfig {
            api_url: mail_url.to_string(),
            api_key: Some(MAIL_API_KEY.to_string()),
            sender_email: "info@example.com".to_string(),
            from_name: "Example Training".to_string(),
            reply_to: "support@example.com".to_string(),
            timeout: Duration::from_secs(5),
        },
        merchant_domain: "example.com".to_string(),
        currency_symbol: "₹".to_string(),
        product_table_path: "products.json".to_string(),
        strategy,
    }
}

pub fn test_catalog() -> ProductCatalog {
    let mut entries = HashMap::new();
    entries.insert(
        "SO1042".to_string(),
        ProductMapping {
            product_name: "DISC Sales Profile".to_string(),
            assessment_type: "DISC".to_string(),
            report_type: "Sales".to_string(),
        },
    );
    entries.insert(
        "SO2001".to_string(),
        ProductMapping {
            product_name: "Harrason Leadership".to_string(),
            assessment_type: "Harrason".to_string(),
            report_type: "Managerial".to_string(),
        },
    );
    ProductCatalog::new(entries)
}

pub fn test_app(config: &Config, catalog: ProductCatalog) -> Router {
    handlers::app(AppState::new(config, catalog))
}

/// POST a raw body to the webhook endpoint and return status and body text.
pub async fn post_raw(app: Router, body: impl Into<Body>) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/razorpay-webhook")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn post_webhook(app: Router, payload: &Value) -> (StatusCode, String) {
    post_raw(app, serde_json::to_vec(payload).unwrap()).await
}

/// Wrap a payment entity in a `payment.captured` delivery.
pub fn captured(entity: Value) -> Value {
    json!({
        "entity": "event",
        "account_id": "acc_TEST",
        "event": "payment.captured",
        "contains": ["payment"],
        "payload": {"payment": {"entity": entity}}
    })
}

/// Primary-provider purchase without an explicit product type.
pub fn disc_payload() -> Value {
    captured(json!({
        "id": "pay_TEST123456789",
        "entity": "payment",
        "amount": 52500,
        "currency": "INR",
        "status": "captured",
        "order_id": "order_TEST987654321",
        "method": "upi",
        "captured": true,
        "description": "DISC Self-Awareness Advanced Report",
        "email": "test@example.com",
        "contact": "+919876543210",
        "notes": {
            "product_id": "101",
            "name": "Test User",
            "user_email": "notify@example.com",
            "gender": "male"
        }
    }))
}

/// Alternate-provider purchase with an explicit product type.
pub fn harrason_payload() -> Value {
    captured(json!({
        "id": "pay_TEST987654321",
        "entity": "payment",
        "amount": 1050,
        "currency": "INR",
        "status": "captured",
        "order_id": "order_TEST123456789",
        "method": "card",
        "captured": true,
        "description": "Harrason Leadership Assessment",
        "email": "test2@example.com",
        "contact": "+919876543211",
        "notes": {
            "product_id": "202",
            "product_name": "Harrason Leadership Assessment",
            "product_type": "harrason",
            "name": "Test User 2",
            "user_email": "test2@example.com",
            "gender": "Female"
        }
    }))
}
