//! OCR text normalization.
//!
//! OCR engines return a receipt as one long run of syllables with arbitrary
//! spacing. Normalization collapses the spacing and re-segments the text into
//! one fragment per line at structural anchors, so that each item line ends
//! after its barcode, discount or dot-matrix price triplet.

use super::rules::patterns::{
    BARCODE, DOT_MATRIX_TRIPLET, INLINE_WHITESPACE, NEGATIVE_AMOUNT, NEWLINE_RUN,
};

/// Normalize raw OCR text. Total and idempotent.
pub fn normalize(raw: &str) -> String {
    let text = INLINE_WHITESPACE.replace_all(raw, " ");
    let text = NEWLINE_RUN.replace_all(&text, "\n");

    // Line breaks after barcodes, discounts and price triplets.
    let text = BARCODE.replace_all(&text, "${0}\n");
    let text = NEGATIVE_AMOUNT.replace_all(&text, "${0}\n");
    let text = DOT_MATRIX_TRIPLET.replace_all(&text, "${0}\n");

    let text = NEWLINE_RUN.replace_all(&text, "\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapses_inline_whitespace() {
        assert_eq!(normalize("  이 마  트\t파주점   "), "이 마 트 파주점");
    }

    #[test]
    fn test_preserves_line_boundaries() {
        assert_eq!(normalize("첫째 줄  \n\n   둘째 줄\r\n셋째"), "첫째 줄\n둘째 줄\n셋째");
    }

    #[test]
    fn test_breaks_after_barcode() {
        assert_eq!(
            normalize("9,800 8807424243936 3월 고 래 잇"),
            "9,800 8807424243936\n3월 고 래 잇"
        );
    }

    #[test]
    fn test_breaks_after_discount() {
        assert_eq!(
            normalize("가 격 할 인 -4,900 * 한 수 위"),
            "가 격 할 인 -4,900\n* 한 수 위"
        );
    }

    #[test]
    fn test_breaks_after_dot_matrix_triplet() {
        assert_eq!(
            normalize("고 추 장 9800。1。 9800 다 음"),
            "고 추 장 9800。1。 9800\n다 음"
        );
    }

    #[test]
    fn test_splits_long_digit_runs() {
        assert_eq!(
            normalize("접 수 20250302100645820007692021 이 마 트"),
            "접 수 2025030210064\n5820007692021\n이 마 트"
        );
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   \n\t  ",
            "3 분 세 차 리 치 버 블 카 샴 _ 9,800。 1 。 9,800 8807424243936 3월 고 래 잇 가 격 할 인 -4,900",
            "POS : 1006-4582 상 품 명 단 가 수 량 금 액",
            "a  b\n\n c \r\n d-1,000,000 12345678901234567890123456789",
            "9800。1。9800。2。3 -5 -",
            include_str!("../../fixtures/emart_paju.txt"),
            include_str!("../../fixtures/traders_kintex.txt"),
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input: {:?}", sample);
        }
    }
}
