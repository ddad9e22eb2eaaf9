//! Receipt field and line-item extraction.

pub mod formats;
pub mod items;
pub mod normalize;
mod parser;
pub mod rules;

pub use formats::{FormatLayout, FormatRegistry, ReceiptFormat};
pub use items::{ItemExtractor, ItemTable, ScoredItem};
pub use normalize::normalize;
pub use parser::{ReceiptParser, RuleBasedReceiptParser};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
