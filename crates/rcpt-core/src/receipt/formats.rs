//! Retailer receipt formats and the registry that selects between them.
//!
//! Each [`Retailer`] owns a static [`FormatLayout`]: the literals and labels
//! its receipts are recognized and parsed by. A [`ReceiptFormat`] is that
//! layout compiled into extractors; a [`FormatRegistry`] holds compiled
//! formats in a fixed order and picks the first one recognizing a text.

use tracing::debug;

use crate::error::{ExtractionError, Field, Result};
use crate::models::receipt::{PartialFields, Retailer};

use super::items::ItemTable;
use super::rules::{
    AmountExtractor, CardNumberExtractor, DateExtractor, FieldExtractor, PaymentMethodExtractor,
    StoreNameExtractor,
};

/// Anchor literals for one retailer's receipts.
#[derive(Debug)]
pub struct FormatLayout {
    /// Store name as printed, without spaces.
    pub store: &'static str,
    /// Spelling to report when the printed name carries meaningful spaces.
    pub store_display: Option<&'static str>,
    /// Label preceding the amount charged.
    pub total_label: &'static str,
    /// Label preceding the VAT amount.
    pub vat_label: &'static str,
    /// Label whose presence means a card payment.
    pub payment_label: &'static str,
    /// Masked card number, matched literally.
    pub card_literal: &'static str,
    /// Item table anchors and noise filters.
    pub items: ItemTableLayout,
}

/// Item table anchors for one retailer.
#[derive(Debug)]
pub struct ItemTableLayout {
    /// Column header labels, in order.
    pub header: &'static [&'static str],
    /// Labels that end the table; the first one after the header wins.
    pub footers: &'static [&'static str],
    /// Fragments containing any of these (ignoring spaces) are not items.
    pub denylist: &'static [&'static str],
    /// Tokens OCR glues to the front of item names.
    pub junk_prefixes: &'static [&'static str],
}

// 이마트 파주점
static EMART: FormatLayout = FormatLayout {
    store: "이마트파주점",
    store_display: None,
    total_label: "결제대상금액",
    vat_label: "부가세",
    payment_label: "카드결제",
    card_literal: "94400200**020",
    items: ItemTableLayout {
        header: &["상품명", "단가", "수량", "금액"],
        footers: &["종품목", "총품목", "합계"],
        denylist: &[
            "할인", "-", "고래잇", "상품명", "종품목", "결제", "포인트", "[라면]",
        ],
        junk_prefixes: &["분세차"],
    },
};

// 트레이더스 홀세일 클럽 킨텍스점
static TRADERS: FormatLayout = FormatLayout {
    store: "트레이더스홀세일클럽킨텍스점",
    store_display: Some("트레이더스 홀세일 클럽 킨텍스점"),
    total_label: "결제대상금액",
    vat_label: "부가세",
    payment_label: "카드결제",
    card_literal: "94400200**020",
    items: ItemTableLayout {
        header: &["상품명", "단가", "수량", "금액"],
        footers: &["총품목", "종품목", "합계"],
        denylist: &["할인", "-", "POINT", "포인트", "상품명", "총품목", "결제"],
        junk_prefixes: &["+", ")", "]", "#", "@", "*"],
    },
};

impl Retailer {
    /// Anchor literals for this retailer.
    pub fn layout(&self) -> &'static FormatLayout {
        match self {
            Retailer::Emart => &EMART,
            Retailer::Traders => &TRADERS,
        }
    }
}

/// A retailer layout compiled into field extractors.
pub struct ReceiptFormat {
    retailer: Retailer,
    store: StoreNameExtractor,
    date: DateExtractor,
    total: AmountExtractor,
    vat: AmountExtractor,
    payment: PaymentMethodExtractor,
    card: CardNumberExtractor,
    item_table: ItemTable,
}

impl ReceiptFormat {
    /// Compile the layout of `retailer`.
    pub fn compile(retailer: Retailer) -> std::result::Result<Self, regex::Error> {
        let layout = retailer.layout();

        Ok(Self {
            retailer,
            store: StoreNameExtractor::new(layout.store)?.with_display(layout.store_display),
            date: DateExtractor::new(),
            total: AmountExtractor::labeled(Field::TotalAmount, layout.total_label)?,
            vat: AmountExtractor::labeled(Field::VatAmount, layout.vat_label)?,
            payment: PaymentMethodExtractor::new(layout.payment_label)?,
            card: CardNumberExtractor::new(layout.card_literal)?,
            item_table: ItemTable::compile(&layout.items)?,
        })
    }

    pub fn retailer(&self) -> Retailer {
        self.retailer
    }

    /// Whether this format's store name appears in the text.
    pub fn recognizes(&self, text: &str) -> bool {
        self.store.is_match(text)
    }

    /// Run every field extractor; each may fail independently.
    pub fn extract_fields(&self, text: &str) -> PartialFields {
        PartialFields {
            store_name: self.store.extract(text),
            date: self.date.extract(text),
            total_amount: self.total.extract(text),
            vat_amount: self.vat.extract(text),
            payment_method: self.payment.extract(text),
            card_number: self.card.extract(text),
        }
    }

    pub fn item_table(&self) -> &ItemTable {
        &self.item_table
    }
}

/// Ordered set of compiled retailer formats.
///
/// Built once and read-only afterwards; safe to share between threads.
pub struct FormatRegistry {
    formats: Vec<ReceiptFormat>,
}

impl FormatRegistry {
    /// Registry of every known retailer in default order.
    pub fn new() -> Result<Self> {
        Self::with_retailers(&Retailer::ALL)
    }

    /// Registry of `retailers`, tried in the given order.
    pub fn with_retailers(retailers: &[Retailer]) -> Result<Self> {
        let formats = retailers
            .iter()
            .map(|&retailer| ReceiptFormat::compile(retailer))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { formats })
    }

    /// First format, in registration order, that recognizes `text`.
    pub fn select(&self, text: &str) -> std::result::Result<&ReceiptFormat, ExtractionError> {
        let format = self
            .formats
            .iter()
            .find(|format| format.recognizes(text))
            .ok_or(ExtractionError::UnsupportedFormat)?;

        debug!("Selected receipt format: {}", format.retailer());
        Ok(format)
    }

    /// Compiled format for `retailer`, if registered.
    pub fn get(&self, retailer: Retailer) -> Option<&ReceiptFormat> {
        self.formats.iter().find(|format| format.retailer == retailer)
    }

    /// Registered retailers in order.
    pub fn retailers(&self) -> impl Iterator<Item = Retailer> + '_ {
        self.formats.iter().map(|format| format.retailer)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::normalize;
    use pretty_assertions::assert_eq;

    const BOTH_STORES: &str = "이 마 트 파 주 점 트 레 이 더 스 홀 세 일 클 럽 킨 텍 스 점";

    #[test]
    fn test_default_order() {
        let registry = FormatRegistry::new().unwrap();
        assert_eq!(
            registry.retailers().collect::<Vec<_>>(),
            vec![Retailer::Emart, Retailer::Traders]
        );
    }

    #[test]
    fn test_first_registered_wins() {
        let emart_first =
            FormatRegistry::with_retailers(&[Retailer::Emart, Retailer::Traders]).unwrap();
        let traders_first =
            FormatRegistry::with_retailers(&[Retailer::Traders, Retailer::Emart]).unwrap();

        for _ in 0..3 {
            assert_eq!(emart_first.select(BOTH_STORES).unwrap().retailer(), Retailer::Emart);
            assert_eq!(traders_first.select(BOTH_STORES).unwrap().retailer(), Retailer::Traders);
        }
    }

    #[test]
    fn test_unsupported_format() {
        let registry = FormatRegistry::new().unwrap();
        let result = registry.select("홈 플 러 스 강 서 점 합 계 12,000");

        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat)));
    }

    #[test]
    fn test_no_fallback_when_retailer_not_registered() {
        let registry = FormatRegistry::with_retailers(&[Retailer::Traders]).unwrap();

        assert!(registry.get(Retailer::Emart).is_none());
        assert!(registry.select("이 마 트 파 주 점").is_err());
    }

    #[test]
    fn test_emart_fields() {
        let text = normalize(include_str!("../../fixtures/emart_paju.txt"));
        let registry = FormatRegistry::new().unwrap();
        let format = registry.select(&text).unwrap();
        let fields = format.extract_fields(&text);

        assert_eq!(format.retailer(), Retailer::Emart);
        assert_eq!(fields.store_name.as_deref(), Some("이마트파주점"));
        assert_eq!(fields.date.map(|d| d.to_string()).as_deref(), Some("2025-03-02"));
        assert_eq!(fields.total_amount, Some(70950));
        assert_eq!(fields.vat_amount, Some(2053));
        assert_eq!(fields.card_number.as_deref(), Some("94400200**020"));
        assert!(fields.missing().is_empty());
    }

    #[test]
    fn test_traders_fields() {
        let text = normalize(include_str!("../../fixtures/traders_kintex.txt"));
        let registry = FormatRegistry::new().unwrap();
        let format = registry.select(&text).unwrap();
        let fields = format.extract_fields(&text);

        assert_eq!(format.retailer(), Retailer::Traders);
        assert_eq!(fields.store_name.as_deref(), Some("트레이더스 홀세일 클럽 킨텍스점"));
        assert_eq!(fields.total_amount, Some(172670));
        assert_eq!(fields.vat_amount, Some(12787));
    }
}
