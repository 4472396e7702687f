/// Database configuration and connection management
pub mod database;

/// Billing document configuration loading from billing.toml
pub mod billing;
