//! Common regex patterns for receipt extraction.
//!
//! Format-specific anchors are compiled from literals by
//! [`tolerant_pattern`](super::tolerant_pattern); the patterns here are shared
//! by every layout.

use lazy_static::lazy_static;
use regex::Regex;

/// Won amount: a comma group OCR split with a space ("12, 787"), else the
/// whole digit/comma run.
pub const WON_AMOUNT: &str = r"([0-9]{1,3}(?:,[0-9]{3})*, [0-9]{3}|[0-9][0-9,]*)";

lazy_static! {
    // Normalization
    pub static ref INLINE_WHITESPACE: Regex = Regex::new(r"[^\S\n]+").unwrap();

    pub static ref NEWLINE_RUN: Regex = Regex::new(r"\s*\n\s*").unwrap();

    // EAN-13 barcode
    pub static ref BARCODE: Regex = Regex::new(r"[0-9]{13}").unwrap();

    // Discount amount, e.g. "-4,900"
    pub static ref NEGATIVE_AMOUNT: Regex = Regex::new(r"-[0-9]+(?:,[0-9]+)*").unwrap();

    // Dot-matrix "price。qty。amount" triplet
    pub static ref DOT_MATRIX_TRIPLET: Regex = Regex::new(
        r"[0-9]+。\s*[0-9]+。\s*[0-9]+"
    ).unwrap();

    // Purchase date, YYYY MM DD with an optional -./ separator
    pub static ref DATE_YMD: Regex = Regex::new(
        r"20[0-9]{2}[-./]?(?:0[1-9]|1[0-2])[-./]?(?:0[1-9]|[12][0-9]|3[01])"
    ).unwrap();

    // Item line shapes, tried in order. Each captures (name, price, quantity, amount).
    pub static ref ITEM_SHAPES: [Regex; 4] = [
        // name without digits
        Regex::new(
            r"^[*\s]*(?:[0-9Q]+\s+)?([^0-9]+)[\s_.]*([0-9,]+)[\s_.]*([0-9]+)[\s_.]*([0-9,]+)(?:\s|$)"
        ).unwrap(),
        // shortest name, digits allowed
        Regex::new(
            r"^[*\s]*(?:[0-9Q]+\s+)?([^.]+?)[\s_]*([0-9,]+)[\s_.]*([0-9]+)[\s_.]*([0-9,]+)(?:\s|$)"
        ).unwrap(),
        // dot/underscore separated columns
        Regex::new(
            r"^[*\s]*(?:[0-9Q]+\s+)?([^.]+)[._]([0-9,]+)[._]([0-9]+)[._]([0-9,]+)(?:\s|$)"
        ).unwrap(),
        // name ending in a number (weight, model code)
        Regex::new(
            r"^[*\s]*(?:[0-9Q]+\s+)?([^0-9]+\s*[0-9]+)\s+([0-9,]+)\s+([0-9]+)\s+([0-9,]+)(?:\s|$)"
        ).unwrap(),
    ];

    // Item name cleanup
    pub static ref LEADING_NOISE: Regex = Regex::new(r"^[0-9Q*\s]+").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    pub static ref TRAILING_DIGITS: Regex = Regex::new(r"[0-9]+\**$").unwrap();

    pub static ref TRAILING_PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)$").unwrap();

    pub static ref NAME_PUNCTUATION: Regex = Regex::new(r"[._]").unwrap();

    pub static ref NAME_LETTER: Regex = Regex::new(r"[가-힣A-Za-z]").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_amount() {
        let re = Regex::new(&format!("^{}", WON_AMOUNT)).unwrap();
        assert_eq!(&re.captures("70,950 0011").unwrap()[1], "70,950");
        assert_eq!(&re.captures("12, 787 합계").unwrap()[1], "12, 787");
        assert_eq!(&re.captures("4500 5,880").unwrap()[1], "4500");
        assert_eq!(&re.captures("1,23,456 0011").unwrap()[1], "1,23,456");
    }

    #[test]
    fn test_item_amount_ends_a_token() {
        assert!(ITEM_SHAPES[0].is_match("우 유 1,000 1 1,000"));
        assert!(!ITEM_SHAPES[0].is_match("컷 파 인 애 플 1.54<0/ 팩"));
    }

    #[test]
    fn test_date_ymd() {
        assert!(DATE_YMD.is_match("2025-03-02"));
        assert!(DATE_YMD.is_match("2025.03.02"));
        assert!(DATE_YMD.is_match("2025030210064"));
        assert!(!DATE_YMD.is_match("2025-13-02"));
    }
}
