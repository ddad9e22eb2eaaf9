//! Receipt record assembly.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::{ItemConfig, RcptConfig};
use crate::models::receipt::{
    ExtractionMode, LenientReceipt, PartialFields, ProcessedReceipt, ReceiptItem,
};

use super::formats::{FormatRegistry, ReceiptFormat};
use super::items::ItemExtractor;
use super::normalize::normalize;
use super::Result;

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse a receipt of a recognized format. Every field and at least one
    /// item are required.
    fn parse(&self, text: &str) -> Result<ProcessedReceipt>;

    /// Extract whatever resolves, assuming the configured layout. Never fails.
    fn parse_lenient(&self, text: &str) -> LenientReceipt;
}

/// Rule-based receipt parser over a registry of retailer formats.
pub struct RuleBasedReceiptParser {
    registry: FormatRegistry,
    lenient_format: ReceiptFormat,
    items: ItemConfig,
}

impl RuleBasedReceiptParser {
    /// Create a parser with every known retailer and default thresholds.
    pub fn new() -> crate::Result<Self> {
        Self::from_config(&RcptConfig::default())
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &RcptConfig) -> crate::Result<Self> {
        config.check()?;

        Ok(Self {
            registry: FormatRegistry::with_retailers(&config.extraction.retailers)?,
            lenient_format: ReceiptFormat::compile(config.extraction.lenient_layout)?,
            items: config.items,
        })
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    fn extract(
        &self,
        format: &ReceiptFormat,
        text: &str,
        mode: ExtractionMode,
    ) -> (PartialFields, Vec<ReceiptItem>) {
        let fields = format.extract_fields(text);
        let items = ItemExtractor::new(format.item_table(), self.items, mode).extract(text);
        (fields, items)
    }
}

impl ReceiptParser for RuleBasedReceiptParser {
    fn parse(&self, text: &str) -> Result<ProcessedReceipt> {
        let start = Instant::now();

        info!("Parsing receipt from {} characters of text", text.len());

        let processed_text = normalize(text);
        let format = self.registry.select(&processed_text)?;

        let (fields, items) = self.extract(format, &processed_text, ExtractionMode::Strict);
        let fields = fields.into_complete()?;

        if items.is_empty() {
            return Err(ExtractionError::NoItemsFound);
        }

        debug!(
            "Parsed {} receipt with {} items in {} ms",
            format.retailer(),
            items.len(),
            start.elapsed().as_millis()
        );

        Ok(ProcessedReceipt {
            raw_text: text.to_string(),
            processed_text,
            retailer: format.retailer(),
            fields,
            items,
        })
    }

    fn parse_lenient(&self, text: &str) -> LenientReceipt {
        let start = Instant::now();

        info!("Parsing receipt leniently from {} characters of text", text.len());

        let processed_text = normalize(text);
        let format = &self.lenient_format;

        let (fields, items) = self.extract(format, &processed_text, ExtractionMode::Lenient);

        let missing = fields.missing();
        if !missing.is_empty() {
            debug!("Missing fields: {:?}", missing);
        }

        debug!(
            "Parsed {} items leniently in {} ms",
            items.len(),
            start.elapsed().as_millis()
        );

        LenientReceipt {
            raw_text: text.to_string(),
            processed_text,
            layout: format.retailer(),
            fields,
            items,
        }
    }
}
