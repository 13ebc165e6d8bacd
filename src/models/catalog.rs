//! Static SO-number → product table.
//!
//! Loaded once at startup from a JSON document shaped as
//! `{ "<SO id>": { "product_name": ..., "assessment_type": ..., "report_type": ... } }`
//! and never mutated afterwards.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMapping {
    pub product_name: String,
    /// Provider label, e.g. "DISC" or "Harrason".
    pub assessment_type: String,
    /// Report label, e.g. "Advanced".
    pub report_type: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read product table {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse product table {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    entries: HashMap<String, ProductMapping>,
}

impl ProductCatalog {
    pub fn new(entries: HashMap<String, ProductMapping>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from disk. A missing file yields an empty catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path_str, "Product table not found, SO lookups disabled");
                return Ok(Self::empty());
            }
            Err(source) => {
                return Err(CatalogError::Read {
                    path: path_str,
                    source,
                })
            }
        };

        let catalog = Self::from_json(&raw).map_err(|source| CatalogError::Parse {
            path: path_str.clone(),
            source,
        })?;

        tracing::info!(path = %path_str, entries = catalog.len(), "Loaded product table");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, ProductMapping> = serde_json::from_str(raw)?;
        Ok(Self::new(entries))
    }

    /// Look up an SO/order identifier. Surrounding whitespace is ignored.
    pub fn get(&self, id: &str) -> Option<&ProductMapping> {
        let key = id.trim();
        if key.is_empty() {
            return None;
        }
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
