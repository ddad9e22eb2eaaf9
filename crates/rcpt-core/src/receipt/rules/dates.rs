//! Purchase date extraction.

use chrono::NaiveDate;

use crate::error::Field;

use super::patterns::DATE_YMD;
use super::FieldExtractor;

/// Date field extractor.
///
/// Takes the first `YYYY[sep]MM[sep]DD` run that is a real calendar date.
/// Receipts print the purchase timestamp and a refund code starting with the
/// same date, so the first hit is the purchase date on every known layout.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn field(&self) -> Field {
        Field::Date
    }

    fn extract(&self, text: &str) -> Option<NaiveDate> {
        DATE_YMD
            .find_iter(text)
            .find_map(|m| parse_compact_date(m.as_str()))
    }
}

/// Parse a date after stripping `-`, `.` and `/` separators.
pub fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    let digits: String = s.chars().filter(|c| !matches!(c, '-' | '.' | '/')).collect();
    if digits.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(&digits, "%Y%m%d").ok()
}
