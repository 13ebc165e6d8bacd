use rust_decimal::Decimal;
use serde::Serialize;

use super::{AssessmentProvider, ReportType};

/// Payment-level facts shared by every buyer in one webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub payment_id: String,
    pub order_id: String,
    /// Amount in major units (minor units / 100).
    pub amount: Decimal,
    /// Payment method, uppercased (e.g. "UPI", "CARD").
    pub method: String,
    pub contact: Option<String>,
    /// Free-text description. In table deployments this carries the SO number.
    pub description: String,
}

/// One buyer extracted from the payment, before classification.
///
/// Name, both emails and gender are always non-empty; missing values have
/// already been replaced by their documented defaults. The product fields may
/// be empty when neither the notes nor the description carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Buyer {
    pub name: String,
    /// Email the buyer logs in with at the provider.
    pub login_email: String,
    /// Address the access email is delivered to.
    pub notification_email: String,
    pub gender: String,
    /// Product descriptor used for keyword classification.
    pub product_name: String,
    /// Explicit product type from the notes, lowercased. May be empty.
    pub product_type: String,
    pub product_id: Option<String>,
}

/// Where a classification came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Keyword,
    Table,
    TableMiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub provider: AssessmentProvider,
    pub report_type: ReportType,
    pub source: ClassificationSource,
}

/// A fully resolved per-buyer registration unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub display_name: String,
    pub login_email: String,
    pub notification_email: String,
    pub gender: String,
    pub product_name: String,
    pub report_type: ReportType,
    pub provider: AssessmentProvider,
    pub amount: Decimal,
    pub payment_id: String,
}

impl RegistrationRequest {
    pub fn new(buyer: &Buyer, payment: &PaymentSummary, classification: Classification) -> Self {
        Self {
            name: buyer.name.clone(),
            display_name: buyer.name.clone(),
            login_email: buyer.login_email.clone(),
            notification_email: buyer.notification_email.clone(),
            gender: buyer.gender.clone(),
            product_name: buyer.product_name.clone(),
            report_type: classification.report_type,
            provider: classification.provider,
            amount: payment.amount,
            payment_id: payment.payment_id.clone(),
        }
    }
}

/// Successful registration with a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub provider: AssessmentProvider,
    pub access_link: String,
    pub respondent_id: Option<String>,
}
