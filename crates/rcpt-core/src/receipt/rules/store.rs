//! Store name extraction.

use regex::Regex;

use crate::error::Field;

use super::{squeeze, tolerant_pattern, FieldExtractor};

/// Store name extractor.
///
/// Matches the store literal with arbitrary whitespace between characters.
/// The reported name is the match with whitespace removed, unless the layout
/// prints its name with meaningful spaces, in which case the canonical
/// display spelling is reported instead.
pub struct StoreNameExtractor {
    anchor: Regex,
    display: Option<&'static str>,
}

impl StoreNameExtractor {
    /// Create an extractor for `literal`.
    pub fn new(literal: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            anchor: Regex::new(&tolerant_pattern(literal))?,
            display: None,
        })
    }

    /// Report `display` instead of the squeezed match.
    pub fn with_display(mut self, display: Option<&'static str>) -> Self {
        self.display = display;
        self
    }

    /// Whether the store literal appears in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.anchor.is_match(text)
    }
}

impl FieldExtractor for StoreNameExtractor {
    type Output = String;

    fn field(&self) -> Field {
        Field::StoreName
    }

    fn extract(&self, text: &str) -> Option<String> {
        let found = self.anchor.find(text)?;
        Some(match self.display {
            Some(display) => display.to_string(),
            None => squeeze(found.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_spaced_store_name() {
        let extractor = StoreNameExtractor::new("이마트파주점").unwrap();
        let text = "빠 른 환 불 접 수 이 마 트 파 주 점 7:(031)950-1234";

        assert!(extractor.is_match(text));
        assert_eq!(extractor.extract(text).as_deref(), Some("이마트파주점"));
    }

    #[test]
    fn test_display_name() {
        let extractor = StoreNameExtractor::new("트레이더스홀세일클럽킨텍스점")
            .unwrap()
            .with_display(Some("트레이더스 홀세일 클럽 킨텍스점"));

        assert_eq!(
            extractor.extract("트 레 이 더 스 홀 세 일 클 럽 킨 텍 스 점 206-86").as_deref(),
            Some("트레이더스 홀세일 클럽 킨텍스점")
        );
    }

    #[test]
    fn test_missing_store() {
        let extractor = StoreNameExtractor::new("이마트파주점").unwrap();
        assert!(extractor.require("이 마 트 일 산 점").is_err());
    }
}
