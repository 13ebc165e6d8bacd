use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::email::EmailService;
use crate::models::ProductCatalog;
use crate::providers::ProviderRegistrar;

/// Request-independent context, built once at startup and shared read-only
/// by every webhook delivery.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Classifier,
    pub registrar: ProviderRegistrar,
    pub email: EmailService,
    /// Login/notification address used when a payment carries no email.
    pub placeholder_email: String,
    pub currency_symbol: String,
}

impl AppState {
    pub fn new(config: &Config, catalog: ProductCatalog) -> Self {
        Self {
            classifier: Classifier::new(config.strategy, Arc::new(catalog)),
            registrar: ProviderRegistrar::new(
                config.disc.clone(),
                config.harrason.clone(),
                config.provider_timeout,
            ),
            email: EmailService::new(config.mail.clone(), config.currency_symbol.clone()),
            placeholder_email: config.placeholder_email(),
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}
