//! Product classification: which provider to register with, and which report.
//!
//! Two strategies exist and a deployment picks one:
//! - `Keyword` reads the product descriptor and the explicit product type.
//! - `Table` looks the SO/order identifier up in the static [`ProductCatalog`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{
    AssessmentProvider, Buyer, Classification, ClassificationSource, PaymentSummary,
    ProductCatalog, ProductMapping, ReportType,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierStrategy {
    #[default]
    Keyword,
    Table,
}

impl ClassifierStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "keywords" => Some(ClassifierStrategy::Keyword),
            "table" | "so" => Some(ClassifierStrategy::Table),
            _ => None,
        }
    }
}

/// First report label contained in `text` (case-insensitive), else `Basic`.
pub fn report_type_from_text(text: &str) -> ReportType {
    let lower = text.to_lowercase();
    ReportType::MATCH_ORDER
        .into_iter()
        .find(|t| lower.contains(&t.as_str().to_lowercase()))
        .unwrap_or_default()
}

/// Alternate provider if either field mentions it, otherwise the primary one.
pub fn provider_from_text(product_name: &str, product_type: &str) -> AssessmentProvider {
    let keyword = AssessmentProvider::ALTERNATE_KEYWORD;
    if product_type.to_lowercase().contains(keyword)
        || product_name.to_lowercase().contains(keyword)
    {
        return AssessmentProvider::Harrason;
    }

    if !product_type.is_empty() && !product_type.to_lowercase().contains("disc") {
        tracing::info!(
            product_type = %product_type,
            "Unknown product type, defaulting to primary provider"
        );
    }
    AssessmentProvider::Disc
}

#[derive(Debug, Clone)]
pub struct Classifier {
    strategy: ClassifierStrategy,
    catalog: Arc<ProductCatalog>,
}

impl Classifier {
    pub fn new(strategy: ClassifierStrategy, catalog: Arc<ProductCatalog>) -> Self {
        Self { strategy, catalog }
    }

    pub fn strategy(&self) -> ClassifierStrategy {
        self.strategy
    }

    pub fn classify(&self, buyer: &Buyer, payment: &PaymentSummary) -> Classification {
        match self.strategy {
            ClassifierStrategy::Keyword => classify_by_keyword(buyer, payment),
            ClassifierStrategy::Table => self.classify_by_table(buyer, payment),
        }
    }

    fn classify_by_table(&self, buyer: &Buyer, payment: &PaymentSummary) -> Classification {
        let hit = [payment.description.as_str(), payment.order_id.as_str()]
            .into_iter()
            .find_map(|key| self.catalog.get(key).map(|mapping| (key, mapping)));

        match hit {
            Some((key, mapping)) => {
                tracing::debug!(
                    so_id = %key,
                    product = %mapping.product_name,
                    "Product table hit"
                );
                classification_from_mapping(mapping)
            }
            None => {
                tracing::warn!(
                    description = %payment.description,
                    order_id = %payment.order_id,
                    "No product table entry, classifying by keywords"
                );
                Classification {
                    source: ClassificationSource::TableMiss,
                    ..classify_by_keyword(buyer, payment)
                }
            }
        }
    }
}

fn classify_by_keyword(buyer: &Buyer, payment: &PaymentSummary) -> Classification {
    let descriptor = if buyer.product_name.is_empty() {
        payment.description.as_str()
    } else {
        buyer.product_name.as_str()
    };

    Classification {
        provider: provider_from_text(descriptor, &buyer.product_type),
        report_type: report_type_from_text(descriptor),
        source: ClassificationSource::Keyword,
    }
}

fn classification_from_mapping(mapping: &ProductMapping) -> Classification {
    let provider = AssessmentProvider::from_label(&mapping.assessment_type).unwrap_or_else(|| {
        tracing::warn!(
            assessment_type = %mapping.assessment_type,
            "Unknown assessment type in product table, using primary provider"
        );
        AssessmentProvider::default()
    });
    let report_type = ReportType::from_label(&mapping.report_type)
        .unwrap_or_else(|| report_type_from_text(&mapping.report_type));

    Classification {
        provider,
        report_type,
        source: ClassificationSource::Table,
    }
}
