//! Labeled won amount extraction (payment total, VAT).

use regex::Regex;

use crate::error::Field;

use super::patterns::WON_AMOUNT;
use super::{tolerant_pattern, FieldExtractor};

/// Extracts the amount printed after a label such as "결제대상금액".
pub struct AmountExtractor {
    field: Field,
    anchor: Regex,
}

impl AmountExtractor {
    /// Create an extractor for the amount following `label`.
    pub fn labeled(field: Field, label: &str) -> Result<Self, regex::Error> {
        let pattern = format!(r"{}\s*{}", tolerant_pattern(label), WON_AMOUNT);
        Ok(Self {
            field,
            anchor: Regex::new(&pattern)?,
        })
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = u64;

    fn field(&self) -> Field {
        self.field
    }

    fn extract(&self, text: &str) -> Option<u64> {
        self.anchor
            .captures_iter(text)
            .find_map(|caps| parse_won_amount(&caps[1]))
    }
}

/// Parse a won amount such as "70,950" or "12, 787".
pub fn parse_won_amount(s: &str) -> Option<u64> {
    let digits: String = s
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// Format a won amount with thousands separators (70,950).
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }

    formatted
}
