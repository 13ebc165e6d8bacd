use std::env;
use std::time::Duration;

use crate::classifier::ClassifierStrategy;

const DEFAULT_DISC_API_URL: &str =
    "https://discapi.discasiaplus.org/api/DISC/Respondent_and_Report_Details_Bodhih";
const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";

/// Endpoint and shared secret for one assessment provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub api_url: String,
    pub credential: String,
}

impl ProviderConfig {
    pub fn new(api_url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            credential: credential.into(),
        }
    }

    /// Both the endpoint and the credential must be non-empty before a call is attempted.
    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.credential.trim().is_empty()
    }
}

/// Mail relay settings and sender identity.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub sender_email: String,
    pub from_name: String,
    pub reply_to: String,
    pub timeout: Duration,
}

impl MailConfig {
    /// `From` header value, e.g. `Bodhi Training Solutions <info@bodhih.com>`.
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.sender_email)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub disc: ProviderConfig,
    pub harrason: ProviderConfig,
    pub provider_timeout: Duration,
    pub mail: MailConfig,
    pub merchant_domain: String,
    pub currency_symbol: String,
    pub product_table_path: String,
    pub strategy: ClassifierStrategy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let strategy = match env::var("CLASSIFIER_STRATEGY") {
            Ok(raw) => ClassifierStrategy::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown CLASSIFIER_STRATEGY, using keyword");
                ClassifierStrategy::Keyword
            }),
            Err(_) => ClassifierStrategy::Keyword,
        };

        Self {
            host,
            port,
            disc: ProviderConfig::new(
                env::var("DISC_API_URL").unwrap_or_else(|_| DEFAULT_DISC_API_URL.to_string()),
                env::var("DISC_CREDENTIAL").unwrap_or_default(),
            ),
            harrason: ProviderConfig::new(
                env::var("HARRASON_API_URL").unwrap_or_default(),
                env::var("HARRASON_CREDENTIAL").unwrap_or_default(),
            ),
            provider_timeout: secs_from_env("PROVIDER_TIMEOUT_SECS", 20),
            mail: MailConfig {
                api_url: env::var("MAIL_API_URL")
                    .unwrap_or_else(|_| DEFAULT_MAIL_API_URL.to_string()),
                api_key: env::var("MAIL_API_KEY").ok().filter(|k| !k.is_empty()),
                sender_email: env::var("SMTP_EMAIL")
                    .unwrap_or_else(|_| "info@bodhih.com".to_string()),
                from_name: env::var("FROM_NAME")
                    .unwrap_or_else(|_| "Bodhi Training Solutions".to_string()),
                reply_to: env::var("REPLY_TO_EMAIL")
                    .unwrap_or_else(|_| "support@bodhih.com".to_string()),
                timeout: secs_from_env("MAIL_TIMEOUT_SECS", 20),
            },
            merchant_domain: env::var("MERCHANT_DOMAIN")
                .unwrap_or_else(|_| "bodhih.com".to_string()),
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "₹".to_string()),
            product_table_path: env::var("PRODUCT_TABLE_PATH")
                .unwrap_or_else(|_| "products.json".to_string()),
            strategy,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Address used when a payment carries no email at all.
    pub fn placeholder_email(&self) -> String {
        format!("no-email@{}", self.merchant_domain)
    }
}

fn secs_from_env(key: &str, default: u64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}
