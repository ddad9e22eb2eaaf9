//! Error types for the rcpt-core library.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// A format pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning receipt text into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No registered retailer format recognizes the text.
    #[error("unsupported receipt format")]
    UnsupportedFormat,

    /// A mandatory anchor pattern did not match.
    #[error("field not found: {0}")]
    FieldNotFound(Field),

    /// The item table is missing or no line survived scoring.
    #[error("no line items found")]
    NoItemsFound,
}

/// Receipt header fields located by anchor patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    StoreName,
    Date,
    TotalAmount,
    PaymentMethod,
    CardNumber,
    VatAmount,
}

impl Field {
    /// Human-readable field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::StoreName => "store name",
            Field::Date => "date",
            Field::TotalAmount => "total amount",
            Field::PaymentMethod => "payment method",
            Field::CardNumber => "card number",
            Field::VatAmount => "VAT amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_names_field() {
        let err = ExtractionError::FieldNotFound(Field::VatAmount);
        assert_eq!(err.to_string(), "field not found: VAT amount");
    }

    #[test]
    fn test_wraps_extraction_error() {
        let err: RcptError = ExtractionError::UnsupportedFormat.into();
        assert_eq!(err.to_string(), "extraction error: unsupported receipt format");
    }
}
