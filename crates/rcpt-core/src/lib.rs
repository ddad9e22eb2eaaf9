//! Core library for Korean retail receipt extraction.
//!
//! This crate provides:
//! - OCR text normalization for receipts printed one syllable at a time
//! - Retailer format recognition (E-Mart, Traders)
//! - Header field extraction (store, date, total, VAT, payment, card)
//! - Line-item extraction with arithmetic cross-checking
//! - Receipt data models and configuration

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{ExtractionError, Field, RcptError, Result};
pub use models::config::{ExtractionConfig, ItemConfig, RcptConfig};
pub use models::receipt::{
    ExtractionMode, LenientReceipt, ParsedFields, PartialFields, PaymentMethod, ProcessedReceipt,
    ReceiptItem, Retailer,
};
pub use receipt::{normalize, FormatRegistry, ReceiptParser, RuleBasedReceiptParser};
