//! Failures of the tracker, one enum per concern.
//!
//! Form input problems are `ValidationError`s and go straight to the user;
//! storage, report and fund-list failures carry their underlying cause.

use thiserror::Error;

/// Validation errors for investment form input.
///
/// These errors are shown directly to users and should be clear and actionable.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Investment type is required")]
    TypeRequired,

    #[error("Unknown investment type: {0}")]
    UnknownType(String),

    #[error("Fund name is required")]
    NameRequired,

    #[error("{0} is required")]
    FieldRequired(&'static str),

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("SIP amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("Invalid duration, expected a whole number of months: {0}")]
    InvalidDuration(String),

    #[error("SIP duration must be at least one month")]
    ZeroDuration,

    #[error("Current amount cannot be negative, got {0}")]
    NegativeCurrentAmount(f64),

    #[error("Invalid start date, expected YYYY-MM-DD: {0}")]
    InvalidDate(String),
}

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Failed to serialize data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a form submission did not produce a saved record.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures while producing the PDF report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build PDF: {0}")]
    Pdf(String),
}

/// Failures while loading a user supplied fund list.
#[derive(Debug, Error)]
pub enum FundListError {
    #[error("Error reading fund list {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Fund list {path} is not a JSON array of names: {source}")]
    Format {
        path: String,
        source: serde_json::Error,
    },
}
