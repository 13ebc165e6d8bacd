//! Per-buyer pipeline: classify, register, notify.
//!
//! Each buyer is handled in isolation. A failure for one buyer is logged and
//! returned as an outcome; it never stops the next buyer or fails the webhook.

use crate::crypto::generate_password;
use crate::email::{AccessEmail, EmailError, EmailSendResult};
use crate::models::{Buyer, PaymentSummary, Registration, RegistrationRequest};
use crate::payments::NormalizedPayment;
use crate::providers::RegistrationError;
use crate::state::AppState;

/// What happened to one buyer.
#[derive(Debug)]
pub enum BuyerOutcome {
    /// Registered and the access email was accepted by the relay
    Notified(Registration),
    /// Registered, but no mail relay key is configured
    NotificationSkipped(Registration),
    /// Registered, but the access email could not be delivered
    NotificationFailed(Registration, EmailError),
    /// Provider registration failed; no email was sent
    RegistrationFailed(RegistrationError),
}

impl BuyerOutcome {
    pub fn is_registered(&self) -> bool {
        !matches!(self, BuyerOutcome::RegistrationFailed(_))
    }
}

/// Run every buyer of a payment through the pipeline, in order.
pub async fn process_payment(
    state: &AppState,
    normalized: &NormalizedPayment,
) -> Vec<BuyerOutcome> {
    if normalized.multi_user {
        tracing::info!(
            users = normalized.buyers.len(),
            "Multiple users in payment, registering each"
        );
    }

    let mut outcomes = Vec::with_capacity(normalized.buyers.len());
    for buyer in &normalized.buyers {
        outcomes.push(process_buyer(state, buyer, &normalized.payment).await);
    }
    outcomes
}

pub async fn process_buyer(
    state: &AppState,
    buyer: &Buyer,
    payment: &PaymentSummary,
) -> BuyerOutcome {
    let classification = state.classifier.classify(buyer, payment);
    let request = RegistrationRequest::new(buyer, payment, classification);

    tracing::info!(
        name = %request.name,
        login_email = %request.login_email,
        notification_email = %request.notification_email,
        product = %request.product_name,
        product_id = buyer.product_id.as_deref().unwrap_or("-"),
        report_type = %request.report_type,
        provider = %request.provider,
        source = ?classification.source,
        "Processing buyer"
    );

    let registration = match state.registrar.register(&request).await {
        Ok(registration) => registration,
        Err(e) => {
            tracing::warn!(
                name = %request.name,
                provider = %request.provider,
                error = %e,
                "Registration failed, no email sent"
            );
            return BuyerOutcome::RegistrationFailed(e);
        }
    };

    let password = generate_password();
    let email = AccessEmail {
        to_email: &request.notification_email,
        name: &request.name,
        login_email: &request.login_email,
        report_type: request.report_type,
        amount: request.amount,
        payment_id: &request.payment_id,
        access_link: &registration.access_link,
        password: &password,
    };

    let sent = state.email.send_access_email(&email).await;
    match sent {
        Ok(EmailSendResult::Sent) => {
            tracing::info!(
                name = %request.name,
                provider = %request.provider,
                to = %request.notification_email,
                "Account created and access email sent"
            );
            BuyerOutcome::Notified(registration)
        }
        Ok(EmailSendResult::NoApiKey) => BuyerOutcome::NotificationSkipped(registration),
        Err(e) => {
            tracing::error!(
                name = %request.name,
                to = %request.notification_email,
                error = %e,
                "Account created but access email failed"
            );
            BuyerOutcome::NotificationFailed(registration, e)
        }
    }
}
