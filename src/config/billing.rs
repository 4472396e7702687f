//! Billing configuration loading from billing.toml
//!
//! Holds the issuer details and labels printed on invoices and receipts. Every
//! field has a default so a missing or partial file is not an error.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "billing.toml";

/// Configuration structure representing the entire billing.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Issuer printed at the top of every document
    pub business: BusinessInfo,
    /// Document presentation settings
    pub documents: DocumentSettings,
}

/// Issuer details
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BusinessInfo {
    /// Trading name
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Default for BusinessInfo {
    fn default() -> Self {
        Self {
            name: "Atelier".to_string(),
            address: None,
            phone: None,
            email: None,
        }
    }
}

/// Document presentation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Currency suffix used when formatting amounts
    pub currency: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            currency: "FCFA".to_string(),
        }
    }
}

/// Loads billing configuration from a TOML file
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`] if
/// the TOML syntax is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BillingConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse billing config: {e}"),
    })
}

/// Loads billing configuration from `BILLING_CONFIG` or ./billing.toml.
///
/// A missing file yields the defaults; an unreadable or malformed one is an error.
pub fn load_default_config() -> Result<BillingConfig> {
    let path = std::env::var("BILLING_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        tracing::warn!("No billing config at {path}, using defaults");
        return Ok(BillingConfig::default());
    }
    load_config(path)
}
