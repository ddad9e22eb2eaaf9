//! Line-item extraction from the receipt's item table.
//!
//! Item rows are OCR'd with unreliable spacing and punctuation, so every
//! fragment is matched against several row shapes and the reading whose
//! `price x quantity` best agrees with the printed amount wins.

use std::ops::ControlFlow;

use regex::Regex;
use tracing::{debug, trace};

use crate::models::config::ItemConfig;
use crate::models::receipt::{ExtractionMode, ReceiptItem};

use super::formats::ItemTableLayout;
use super::rules::patterns::{
    BARCODE, ITEM_SHAPES, LEADING_NOISE, NAME_LETTER, NAME_PUNCTUATION, TRAILING_DIGITS,
    TRAILING_PARENTHETICAL, WHITESPACE_RUN,
};
use super::rules::{squeeze, tolerant_pattern};

/// A layout's item table anchors, compiled.
pub struct ItemTable {
    header: Regex,
    footer: Regex,
    denylist: Vec<String>,
    junk_prefix: Option<Regex>,
    header_residue: Regex,
}

impl ItemTable {
    pub fn compile(layout: &ItemTableLayout) -> Result<Self, regex::Error> {
        let header = Regex::new(&tolerant_pattern(&layout.header.concat()))?;

        let footer = Regex::new(&alternation(layout.footers))?;

        let junk_prefix = if layout.junk_prefixes.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("^{}+", alternation(layout.junk_prefixes)))?)
        };

        let residue = layout
            .header
            .iter()
            .map(|label| tolerant_pattern(label))
            .collect::<Vec<_>>()
            .join(".*");
        let header_residue = Regex::new(&format!("{}.*$", residue))?;

        Ok(Self {
            header,
            footer,
            denylist: layout.denylist.iter().map(|entry| squeeze(entry)).collect(),
            junk_prefix,
            header_residue,
        })
    }

    /// Text between the column header and the first footer after it.
    ///
    /// `None` unless both anchors are present.
    pub fn section<'t>(&self, text: &'t str) -> Option<&'t str> {
        let header = self.header.find(text)?;
        let rest = &text[header.end()..];
        let footer = self.footer.find(rest)?;
        Some(&rest[..footer.start()])
    }

    /// Whether a fragment is a discount, promotion or header line.
    pub fn is_excluded(&self, fragment: &str) -> bool {
        let squeezed = squeeze(fragment);
        self.denylist.iter().any(|entry| squeezed.contains(entry.as_str()))
    }
}

fn alternation(literals: &[&str]) -> String {
    let alternatives = literals
        .iter()
        .map(|literal| tolerant_pattern(literal))
        .collect::<Vec<_>>()
        .join("|");
    format!("(?:{})", alternatives)
}

/// One row shape's reading of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCandidate {
    /// Name capture before cleanup.
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub amount: u64,
}

impl LineCandidate {
    /// Read a line with one row shape.
    ///
    /// Rejects captures whose numbers are not plain digits once `,` `.` `_`
    /// are removed, or that are zero.
    pub fn capture(shape: &Regex, line: &str) -> Option<Self> {
        let caps = shape.captures(line)?;

        let price: u64 = parse_count(&caps[2])?;
        let quantity: u32 = parse_count(&caps[3])?;
        let amount: u64 = parse_count(&caps[4])?;

        if price == 0 || quantity == 0 || amount == 0 {
            return None;
        }

        Some(Self {
            name: caps[1].trim().to_string(),
            price,
            quantity,
            amount,
        })
    }

    /// |price x quantity - amount|
    pub fn error(&self) -> u64 {
        self.price
            .saturating_mul(u64::from(self.quantity))
            .abs_diff(self.amount)
    }

    /// Re-derive the unit price from the amount.
    ///
    /// OCR often fuses a digit from the product name (a weight, a pack count)
    /// into the price column. When the reading is far off and the amount is
    /// substantial, `round(amount / quantity)` replaces the price if it is
    /// plausible and agrees better.
    pub fn corrected(&self, config: &ItemConfig) -> Option<Self> {
        let error = self.error();
        if error <= config.correction_min_error || self.amount < config.correction_min_amount {
            return None;
        }

        let quantity = u64::from(self.quantity);
        let price = self.amount.saturating_add(quantity / 2) / quantity;
        if price < config.min_corrected_price {
            return None;
        }

        let candidate = Self { price, ..self.clone() };
        (candidate.error() < error).then_some(candidate)
    }

    fn scored(self, config: &ItemConfig) -> ScoredCandidate {
        match self.corrected(config) {
            Some(corrected) => ScoredCandidate {
                error: corrected.error(),
                candidate: corrected,
                corrected: true,
            },
            None => ScoredCandidate {
                error: self.error(),
                candidate: self,
                corrected: false,
            },
        }
    }
}

struct ScoredCandidate {
    candidate: LineCandidate,
    error: u64,
    corrected: bool,
}

impl ScoredCandidate {
    // Only a reading taken as printed ends the search.
    fn is_exact(&self) -> bool {
        self.error == 0 && !self.corrected
    }
}

/// An accepted item with the arithmetic it was accepted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredItem {
    pub item: ReceiptItem,
    /// Printed line amount.
    pub amount: u64,
    /// |price x quantity - amount| of the accepted reading.
    pub error: u64,
    /// Whether the unit price was re-derived from the amount.
    pub corrected: bool,
}

/// Extracts purchased items from normalized receipt text.
pub struct ItemExtractor<'a> {
    table: &'a ItemTable,
    config: ItemConfig,
    mode: ExtractionMode,
}

impl<'a> ItemExtractor<'a> {
    pub fn new(table: &'a ItemTable, config: ItemConfig, mode: ExtractionMode) -> Self {
        Self { table, config, mode }
    }

    /// Items in receipt order.
    pub fn extract(&self, text: &str) -> Vec<ReceiptItem> {
        self.extract_scored(text)
            .into_iter()
            .map(|scored| scored.item)
            .collect()
    }

    /// Items in receipt order, with their scores.
    pub fn extract_scored(&self, text: &str) -> Vec<ScoredItem> {
        let Some(section) = self.table.section(text) else {
            debug!("No item table found");
            return Vec::new();
        };

        let mut accepted: Vec<ScoredItem> = Vec::new();

        for fragment in section.split('\n').filter(|f| !f.trim().is_empty()) {
            if self.table.is_excluded(fragment) {
                trace!("Skipping excluded line: {}", fragment);
                continue;
            }

            let Some(scored) = self.score_line(fragment) else {
                trace!("No item reading for line: {}", fragment);
                continue;
            };

            if accepted.iter().any(|seen| seen.item.same_line(&scored.item)) {
                trace!("Skipping duplicate item: {}", scored.item.name);
                continue;
            }

            debug!(
                "Item {} {} x {} (error {}{})",
                scored.item.name,
                scored.item.price,
                scored.item.quantity,
                scored.error,
                if scored.corrected { ", corrected" } else { "" }
            );
            accepted.push(scored);
        }

        debug!("Extracted {} items", accepted.len());
        accepted
    }

    /// Best reading of one table fragment, if acceptable.
    pub fn score_line(&self, fragment: &str) -> Option<ScoredItem> {
        let line = prepare_line(fragment);

        let best = ITEM_SHAPES
            .iter()
            .filter_map(|shape| LineCandidate::capture(shape, &line))
            .map(|candidate| candidate.scored(&self.config))
            .try_fold(None::<ScoredCandidate>, |best, next| {
                let exact = next.is_exact();
                let best = match best {
                    Some(best) if best.error <= next.error => best,
                    _ => next,
                };
                if exact {
                    ControlFlow::Break(Some(best))
                } else {
                    ControlFlow::Continue(Some(best))
                }
            });

        let best = match best {
            ControlFlow::Break(best) | ControlFlow::Continue(best) => best?,
        };

        if best.error > self.config.tolerance {
            trace!("Rejected {:?}: error {}", best.candidate, best.error);
            return None;
        }

        let name = self.clean_name(&best.candidate.name);
        if !NAME_LETTER.is_match(&name) {
            trace!("Rejected name without letters: {:?}", name);
            return None;
        }

        Some(ScoredItem {
            item: ReceiptItem::new(name, best.candidate.price, best.candidate.quantity),
            amount: best.candidate.amount,
            error: best.error,
            corrected: best.corrected,
        })
    }

    /// Strip OCR noise from a captured name.
    ///
    /// Strict mode removes all whitespace; lenient mode keeps single spaces.
    pub fn clean_name(&self, raw: &str) -> String {
        let name = LEADING_NOISE.replace(raw, "");
        let name = match self.mode {
            ExtractionMode::Strict => WHITESPACE_RUN.replace_all(&name, ""),
            ExtractionMode::Lenient => WHITESPACE_RUN.replace_all(&name, " "),
        };

        let name = match &self.table.junk_prefix {
            Some(prefix) => prefix.replace(&name, "").trim().to_string(),
            None => name.trim().to_string(),
        };

        let name = TRAILING_DIGITS.replace(&name, "");
        let name = TRAILING_PARENTHETICAL.replace(&name, "");
        let name = NAME_PUNCTUATION.replace_all(&name, "");
        let name = self.table.header_residue.replace(&name, "");

        name.trim().to_string()
    }
}

/// Drop the barcode and normalize dot-matrix separators.
fn prepare_line(fragment: &str) -> String {
    let line = BARCODE.replace(fragment, "");
    line.trim().replace('。', ".").replace('_', " ")
}

/// Parse a numeric column after removing `,` `.` `_`.
fn parse_count<T: std::str::FromStr>(s: &str) -> Option<T> {
    let digits: String = s.chars().filter(|c| !matches!(c, ',' | '.' | '_')).collect();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}
