//! Rule-based field extractors for receipt headers.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod payment;
pub mod store;

pub use amounts::{format_won, parse_won_amount, AmountExtractor};
pub use dates::{parse_compact_date, DateExtractor};
pub use payment::{CardNumberExtractor, PaymentMethodExtractor};
pub use store::StoreNameExtractor;

use crate::error::{ExtractionError, Field};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// The field this extractor locates.
    fn field(&self) -> Field;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract the field, failing with [`ExtractionError::FieldNotFound`].
    fn require(&self, text: &str) -> Result<Self::Output, ExtractionError> {
        self.extract(text)
            .ok_or(ExtractionError::FieldNotFound(self.field()))
    }
}

/// Build a pattern matching `literal` with any whitespace or underscores
/// between its characters.
///
/// OCR splits Hangul labels into single syllables ("결 제 대 상 금 액"), so
/// every anchor is matched this way.
pub fn tolerant_pattern(literal: &str) -> String {
    literal
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(r"[\s_]*")
}

/// Remove all whitespace and underscores.
pub fn squeeze(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_tolerant_pattern() {
        let re = Regex::new(&tolerant_pattern("부가세")).unwrap();
        assert!(re.is_match("부 가 세 2,053"));
        assert!(re.is_match("부가_세"));
        assert!(!re.is_match("부 가 액"));
    }

    #[test]
    fn test_tolerant_pattern_escapes() {
        let re = Regex::new(&tolerant_pattern("[라면]")).unwrap();
        assert!(re.is_match("[ 라 면 ] 3 개"));
    }

    #[test]
    fn test_squeeze() {
        assert_eq!(squeeze("이 마 트 _ 파주점"), "이마트파주점");
    }
}
