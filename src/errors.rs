//! Unified error type for the billing subsystem.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors raised by billing operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage-layer failure, including uniqueness violations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The referenced custom order does not exist
    #[error("Custom order not found: {id}")]
    CustomOrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// The referenced order payment does not exist
    #[error("Payment not found: {id}")]
    PaymentNotFound {
        /// Requested payment id
        id: i64,
    },

    /// The referenced invoice does not exist
    #[error("Invoice not found: {id}")]
    InvoiceNotFound {
        /// Requested invoice id
        id: i64,
    },

    /// The referenced receipt does not exist
    #[error("Receipt not found: {id}")]
    ReceiptNotFound {
        /// Requested receipt id
        id: i64,
    },

    /// Amount rejected at the recording boundary
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// Garment quantity must be at least one
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// Payment method string outside the accepted set
    #[error("Unknown payment method: {value}")]
    UnknownPaymentMethod {
        /// The rejected value
        value: String,
    },

    /// No 4-digit sequence number left for this day
    #[error("Daily sequence exhausted for prefix {prefix}")]
    SequenceExhausted {
        /// Day prefix, e.g. `FAC-170126-`
        prefix: String,
    },

    /// I/O failure while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true when the storage layer rejected a write because of a unique constraint.
    ///
    /// Concurrent number generation and concurrent invoice materialization both
    /// surface this way.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(err) => matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))),
            _ => false,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
