//! Access email delivery tests against a local mock mail relay

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::*;
use enrollhook::email::{AccessEmail, EmailError, EmailSendResult, EmailService};
use enrollhook::models::ReportType;
use rust_decimal::Decimal;

fn mail_config(url: &str) -> MailConfig {
    MailConfig {
        api_url: url.to_string(),
        api_key: Some(MAIL_API_KEY.to_string()),
        sender_email: "info@example.com".to_string(),
        from_name: "Example Training".to_string(),
        reply_to: "support@example.com".to_string(),
        timeout: Duration::from_secs(5),
    }
}

fn access_email() -> AccessEmail<'static> {
    AccessEmail {
        to_email: "notify@example.com",
        name: "Test User",
        login_email: "test@example.com",
        report_type: ReportType::CareerEntryLevel,
        amount: Decimal::new(5250000, 2),
        payment_id: "pay_EMAIL",
        access_link: "https://assess.example/r/email",
        password: "xY7!abcdEFGH",
    }
}

#[tokio::test]
async fn test_relay_receives_authenticated_message() {
    let relay = MockServer::start(mail_accepted).await;
    let service = EmailService::new(mail_config(&relay.url), "₹");

    let result = service.send_access_email(&access_email()).await.unwrap();
    assert_eq!(result, EmailSendResult::Sent);

    let sent = relay.requests();
    assert_eq!(sent.len(), 1);
    let message = &sent[0];
    assert_eq!(
        message.headers.get("authorization").unwrap(),
        &format!("Bearer {}", MAIL_API_KEY)
    );
    assert_eq!(message.body["to"], serde_json::json!(["notify@example.com"]));
    assert_eq!(message.body["subject"], "Your Career entry level Assessment is Ready!");
    let html = message.body["html"].as_str().unwrap();
    assert!(html.contains("₹52,500.00"));
    assert!(html.contains("xY7!abcdEFGH"));
    assert!(html.contains("https://assess.example/r/email"));
}

#[tokio::test]
async fn test_relay_rejection_is_an_error() {
    let relay = MockServer::start(|_| (StatusCode::UNPROCESSABLE_ENTITY, "bad sender".to_string())).await;
    let service = EmailService::new(mail_config(&relay.url), "₹");

    let err = service.send_access_email(&access_email()).await.unwrap_err();
    match err {
        EmailError::Rejected { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body, "bad sender");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(relay.count(), 1, "no automatic retry");
}

#[tokio::test]
async fn test_relay_timeout_is_bounded() {
    let relay = MockServer::start_with_delay(mail_accepted, Duration::from_secs(2)).await;
    let mut config = mail_config(&relay.url);
    config.timeout = Duration::from_millis(200);
    let service = EmailService::new(config, "₹");

    let err = service.send_access_email(&access_email()).await.unwrap_err();
    assert!(matches!(err, EmailError::Transport(ref e) if e.is_timeout()));
}
