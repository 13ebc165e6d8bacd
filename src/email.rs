//! Access email delivery.
//!
//! After a successful registration the buyer receives one email with the
//! access link, their login email and a freshly generated password. Mail goes
//! out through an authenticated HTTPS relay (Resend-compatible API). Delivery
//! failures are reported to the caller, which logs them; they never undo the
//! registration.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MailConfig;
use crate::models::ReportType;
use crate::util::{format_money, truncate};

/// Result of attempting to send an access email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailSendResult {
    /// Relay accepted the message
    Sent,
    /// No relay API key configured, nothing sent
    NoApiKey,
}

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("mail relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Everything the access email shows.
#[derive(Debug, Clone)]
pub struct AccessEmail<'a> {
    pub to_email: &'a str,
    pub name: &'a str,
    pub login_email: &'a str,
    pub report_type: ReportType,
    pub amount: Decimal,
    pub payment_id: &'a str,
    pub access_link: &'a str,
    pub password: &'a str,
}

/// Rendered subject and bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Relay API request body.
#[derive(Debug, Serialize)]
struct MailRelayRequest<'a> {
    from: String,
    to: Vec<&'a str>,
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Relay API response.
#[derive(Debug, Deserialize)]
struct MailRelayResponse {
    #[allow(dead_code)]
    id: Option<String>,
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Clone)]
pub struct EmailService {
    config: MailConfig,
    currency_symbol: String,
    http_client: Client,
}

impl EmailService {
    pub fn new(config: MailConfig, currency_symbol: impl Into<String>) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("Failed to create HTTP client"),
            config,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Render the access email.
    pub fn compose(&self, email: &AccessEmail<'_>) -> ComposedEmail {
        let amount = format_money(&self.currency_symbol, email.amount);
        let subject = format!("Your {} Assessment is Ready!", email.report_type);

        let text = format!(
            "Payment Confirmed!\n\nDear {},\n\nThank you for purchasing: {} Assessment\n\nAmount Paid: {}\nPayment ID: {}\n\nYour Assessment Access\nLogin Email: {}\nPassword: {}\n\nStart your assessment: {}\n\nThis link is unique to you. Keep this email safe.\n\nNeed help? Reply to this email.\n{}",
            email.name,
            email.report_type,
            amount,
            email.payment_id,
            email.login_email,
            email.password,
            email.access_link,
            self.config.from_name,
        );

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 30px auto; padding: 20px; background: #f9f9f9; border-radius: 10px;">
<h2 style="color: #2c3e50; text-align: center;">Payment Confirmed!</h2>
<p>Dear <strong>{name}</strong>,</p>
<p>Thank you for purchasing:</p>
<h3 style="background: #e3f2fd; padding: 15px; border-radius: 8px; text-align: center;">{report} Assessment</h3>
<p><strong>Amount Paid:</strong> {amount}<br><br>
<strong>Payment ID:</strong> {payment_id}</p>
<h3>Your Assessment Access</h3>
<p><strong>Login Email:</strong> {login}<br><br>
<strong>Password:</strong> <code style="background: #eee; padding: 12px; font-size: 15px;">{password}</code></p>
<div style="text-align: center; margin: 30px 0;">
<a href="{link}" style="background: #1976d2; color: white; padding: 16px 32px; text-decoration: none; border-radius: 8px; font-size: 18px;">Start Your Assessment Now</a>
</div>
<p style="background: #fff3cd; padding: 15px; border-radius: 8px;">This link is unique to you. Keep this email safe.</p>
<p style="font-size: 12px; color: #777; text-align: center;">Need help? Reply to this email.<br>{sender}</p>
</body>
</html>"#,
            name = escape_html(email.name),
            report = email.report_type,
            amount = escape_html(&amount),
            payment_id = escape_html(email.payment_id),
            login = escape_html(email.login_email),
            password = escape_html(email.password),
            link = escape_html(email.access_link),
            sender = escape_html(&self.config.from_name),
        );

        ComposedEmail {
            subject,
            text,
            html,
        }
    }

    /// Compose and send the access email.
    pub async fn send_access_email(
        &self,
        email: &AccessEmail<'_>,
    ) -> Result<EmailSendResult, EmailError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::warn!(
                to = %email.to_email,
                "No mail relay API key configured, cannot send access email"
            );
            return Ok(EmailSendResult::NoApiKey);
        };

        let composed = self.compose(email);
        let request = MailRelayRequest {
            from: self.config.from_header(),
            to: vec![email.to_email],
            reply_to: &self.config.reply_to,
            subject: &composed.subject,
            text: &composed.text,
            html: &composed.html,
        };

        let response = self
            .http_client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, to = %email.to_email, "Failed to reach mail relay");
                EmailError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %truncate(&body, 300),
                to = %email.to_email,
                "Mail relay rejected access email"
            );
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body: truncate(&body, 300).to_string(),
            });
        }

        if let Err(e) = response.json::<MailRelayResponse>().await {
            // Accepted but with an unexpected body; the message is still queued.
            tracing::debug!(error = %e, "Unexpected mail relay response body");
        }

        tracing::info!(to = %email.to_email, "Access email sent");
        Ok(EmailSendResult::Sent)
    }
}
