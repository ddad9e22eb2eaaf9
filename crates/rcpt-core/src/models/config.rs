//! Configuration structures for the extraction engine.

use serde::{Deserialize, Serialize};

use crate::error::{RcptError, Result};
use crate::models::receipt::{ExtractionMode, Retailer};

/// Main configuration for rcpt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Format dispatch and strictness.
    pub extraction: ExtractionConfig,

    /// Line-item scoring thresholds.
    pub items: ItemConfig,
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Default extraction mode.
    pub mode: ExtractionMode,

    /// Retailer formats in registry (first match wins) order.
    pub retailers: Vec<Retailer>,

    /// Layout assumed by lenient extraction, which skips recognition.
    pub lenient_layout: Retailer,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Strict,
            retailers: Retailer::ALL.to_vec(),
            lenient_layout: Retailer::Emart,
        }
    }
}

/// Thresholds for line-item arithmetic scoring, all in won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Maximum |price x quantity - amount| for an accepted item.
    pub tolerance: u64,

    /// Error above which price correction is attempted.
    pub correction_min_error: u64,

    /// Minimum line amount for price correction.
    pub correction_min_amount: u64,

    /// Minimum corrected unit price.
    pub min_corrected_price: u64,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            tolerance: 1000,
            correction_min_error: 100,
            correction_min_amount: 1000,
            min_corrected_price: 1000,
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations the engine cannot run with.
    pub fn check(&self) -> Result<()> {
        if self.extraction.retailers.is_empty() {
            return Err(RcptError::Config(
                "extraction.retailers must name at least one retailer".to_string(),
            ));
        }

        let mut seen = Vec::with_capacity(self.extraction.retailers.len());
        for retailer in &self.extraction.retailers {
            if seen.contains(retailer) {
                return Err(RcptError::Config(format!(
                    "retailer {} is registered twice",
                    retailer
                )));
            }
            seen.push(*retailer);
        }

        Ok(())
    }
}
