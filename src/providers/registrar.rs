use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::models::{AssessmentProvider, Registration, RegistrationRequest, ReportType};
use crate::util::{title_case, truncate};

/// Characters of a provider response body kept in logs and errors.
const LOGGED_BODY_CHARS: usize = 300;

/// Why a registration did not produce an access link.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("{0} API is not configured")]
    NotConfigured(AssessmentProvider),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("registration rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload<'a> {
    pub credentials: Credentials<'a>,
    pub respondent_details: Vec<RespondentDetails<'a>>,
    pub transaction_details: TransactionDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials<'a> {
    pub encrypted_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentDetails<'a> {
    pub name: &'a str,
    pub display_name: &'a str,
    pub gender: String,
    #[serde(rename = "eMailAddress")]
    pub email_address: &'a str,
    #[serde(rename = "type")]
    pub report_type: ReportType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub transaction_id: u64,
    pub transaction_date: String,
    pub is_successful: bool,
}

impl<'a> RegistrationPayload<'a> {
    /// One respondent per call, so the transaction id is always its 1-based position: 1.
    pub fn new(credential: &'a str, request: &'a RegistrationRequest, now: DateTime<Utc>) -> Self {
        Self {
            credentials: Credentials {
                encrypted_password: credential,
            },
            respondent_details: vec![RespondentDetails {
                name: &request.name,
                display_name: &request.display_name,
                gender: title_case(&request.gender),
                email_address: &request.login_email,
                report_type: request.report_type,
            }],
            transaction_details: TransactionDetails {
                transaction_id: 1,
                transaction_date: transaction_timestamp(now),
                is_successful: true,
            },
        }
    }
}

/// UTC timestamp with millisecond precision and a literal `Z`,
/// e.g. `2024-03-05T09:15:02.117Z`.
pub fn transaction_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationResponse {
    #[serde(default)]
    success: bool,
    error_message: Option<String>,
    #[serde(default)]
    respondent_details: Vec<RespondentResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RespondentResult {
    link: Option<String>,
    respondent_id: Option<Value>,
}

/// Interpret a provider reply. Only HTTP 200 with `success: true` and at
/// least one respondent entry carrying a link counts as registered.
pub fn parse_response(
    provider: AssessmentProvider,
    status: StatusCode,
    body: &str,
) -> Result<Registration, RegistrationError> {
    if status != StatusCode::OK {
        return Err(RegistrationError::HttpStatus {
            status: status.as_u16(),
            body: truncate(body, LOGGED_BODY_CHARS).to_string(),
        });
    }

    let response: RegistrationResponse = serde_json::from_str(body)
        .map_err(|e| RegistrationError::MalformedResponse(e.to_string()))?;

    if !response.success {
        return Err(RegistrationError::Rejected(
            response
                .error_message
                .unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let Some(first) = response.respondent_details.into_iter().next() else {
        return Err(RegistrationError::Rejected(
            "no respondent details in response".to_string(),
        ));
    };

    let access_link = first
        .link
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| RegistrationError::Rejected("respondent entry has no link".to_string()))?;

    let respondent_id = first.respondent_id.and_then(|id| match id {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Ok(Registration {
        provider,
        access_link,
        respondent_id,
    })
}

/// Registers buyers with whichever provider their purchase was classified to.
#[derive(Debug, Clone)]
pub struct ProviderRegistrar {
    http_client: Client,
    disc: ProviderConfig,
    harrason: ProviderConfig,
}

impl ProviderRegistrar {
    pub fn new(disc: ProviderConfig, harrason: ProviderConfig, timeout: Duration) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            disc,
            harrason,
        }
    }

    fn config(&self, provider: AssessmentProvider) -> &ProviderConfig {
        match provider {
            AssessmentProvider::Disc => &self.disc,
            AssessmentProvider::Harrason => &self.harrason,
        }
    }

    /// Register one respondent. Every failure comes back as an `Err`; nothing panics.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<Registration, RegistrationError> {
        let provider = request.provider;
        let config = self.config(provider);

        // Only the alternate provider is optional; the primary is always attempted.
        if provider == AssessmentProvider::Harrason && !config.is_configured() {
            tracing::warn!(provider = %provider, "Provider API not configured, skipping");
            return Err(RegistrationError::NotConfigured(provider));
        }

        let payload = RegistrationPayload::new(&config.credential, request, Utc::now());

        tracing::info!(
            provider = %provider,
            url = %config.api_url,
            credential_len = config.credential.len(),
            name = %request.name,
            email = %request.login_email,
            report_type = %request.report_type,
            "Registering respondent"
        );

        let response = self
            .http_client
            .post(&config.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = %provider, error = %e, "Provider request failed");
                RegistrationError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(provider = %provider, error = %e, "Failed to read provider response");
            RegistrationError::Transport(e)
        })?;

        tracing::debug!(
            provider = %provider,
            status = %status,
            body = %truncate(&body, LOGGED_BODY_CHARS),
            "Provider response"
        );

        match parse_response(provider, status, &body) {
            Ok(registration) => {
                tracing::info!(
                    provider = %provider,
                    link = %registration.access_link,
                    respondent_id = ?registration.respondent_id,
                    "Respondent registered"
                );
                Ok(registration)
            }
            Err(e) => {
                tracing::error!(provider = %provider, error = %e, "Provider registration failed");
                Err(e)
            }
        }
    }
}
