//! Receipt data models produced by the extraction engine.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Field};

/// Retailer whose receipt layout the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retailer {
    /// 이마트 파주점.
    Emart,
    /// 트레이더스 홀세일 클럽 킨텍스점.
    Traders,
}

impl Retailer {
    /// Every known retailer, in default registry order.
    pub const ALL: [Retailer; 2] = [Retailer::Emart, Retailer::Traders];

    /// Configuration key of the retailer.
    pub fn name(&self) -> &'static str {
        match self {
            Retailer::Emart => "emart",
            Retailer::Traders => "traders",
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Retailer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emart" | "e-mart" => Ok(Retailer::Emart),
            "traders" => Ok(Retailer::Traders),
            other => Err(format!("unknown retailer: {}", other)),
        }
    }
}

/// How strictly missing fields are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Every field and at least one item are required.
    #[default]
    Strict,
    /// Whatever resolved is returned; nothing is required.
    Lenient,
}

/// Payment rail detected on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Card payment ("카드결제").
    #[serde(rename = "credit card")]
    CreditCard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Product name after cleanup.
    pub name: String,

    /// Unit price in won.
    pub price: u64,

    /// Quantity purchased.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ReceiptItem {
    pub fn new(name: impl Into<String>, price: u64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Line subtotal (price x quantity).
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }

    /// Whether two items describe the same purchase line.
    pub fn same_line(&self, other: &ReceiptItem) -> bool {
        self.name == other.name && self.price == other.price && self.quantity == other.quantity
    }
}

/// Header fields of a fully recognized receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFields {
    /// Store name.
    pub store_name: String,

    /// Purchase date.
    pub date: NaiveDate,

    /// Amount charged, in won.
    pub total_amount: u64,

    /// VAT included in the total, in won.
    pub vat_amount: u64,

    /// Payment method.
    pub payment_method: PaymentMethod,

    /// Masked card number as printed.
    pub card_number: String,
}

/// Header fields where any may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
}

impl PartialFields {
    /// Fields that did not resolve, in mandatory-check order.
    pub fn missing(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.store_name.is_none() {
            missing.push(Field::StoreName);
        }
        if self.date.is_none() {
            missing.push(Field::Date);
        }
        if self.total_amount.is_none() {
            missing.push(Field::TotalAmount);
        }
        if self.payment_method.is_none() {
            missing.push(Field::PaymentMethod);
        }
        if self.card_number.is_none() {
            missing.push(Field::CardNumber);
        }
        if self.vat_amount.is_none() {
            missing.push(Field::VatAmount);
        }
        missing
    }

    /// Require every field, failing on the first missing one.
    pub fn into_complete(self) -> Result<ParsedFields, ExtractionError> {
        let missing = |field| ExtractionError::FieldNotFound(field);

        let store_name = self.store_name.ok_or(missing(Field::StoreName))?;
        let date = self.date.ok_or(missing(Field::Date))?;
        let total_amount = self.total_amount.ok_or(missing(Field::TotalAmount))?;
        let payment_method = self.payment_method.ok_or(missing(Field::PaymentMethod))?;
        let card_number = self.card_number.ok_or(missing(Field::CardNumber))?;
        let vat_amount = self.vat_amount.ok_or(missing(Field::VatAmount))?;

        Ok(ParsedFields {
            store_name,
            date,
            total_amount,
            vat_amount,
            payment_method,
            card_number,
        })
    }
}

/// A receipt parsed in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedReceipt {
    /// OCR text as received.
    pub raw_text: String,

    /// Normalized text the fields were extracted from.
    pub processed_text: String,

    /// Retailer format that recognized the text.
    pub retailer: Retailer,

    /// Header fields.
    #[serde(flatten)]
    pub fields: ParsedFields,

    /// Items in receipt order.
    pub items: Vec<ReceiptItem>,
}

impl ProcessedReceipt {
    /// Sum of item subtotals before discounts.
    pub fn items_total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.subtotal()))
    }

    /// Check the record for inconsistencies worth reporting.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.fields.total_amount == 0 {
            issues.push("Total amount is zero".to_string());
        }

        if self.fields.vat_amount > self.fields.total_amount {
            issues.push(format!(
                "VAT ({}) exceeds total amount ({})",
                self.fields.vat_amount, self.fields.total_amount
            ));
        }

        // Discounts only ever lower the charged total.
        let items_total = self.items_total();
        if items_total < self.fields.total_amount {
            issues.push(format!(
                "Item subtotal ({}) is below the charged total ({}); some items may be missing",
                items_total, self.fields.total_amount
            ));
        }

        issues
    }
}

/// A receipt parsed in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenientReceipt {
    /// OCR text as received.
    pub raw_text: String,

    /// Normalized text the fields were extracted from.
    pub processed_text: String,

    /// Layout assumed for extraction.
    pub layout: Retailer,

    /// Header fields that resolved.
    #[serde(flatten)]
    pub fields: PartialFields,

    /// Items in receipt order, possibly empty.
    pub items: Vec<ReceiptItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete_fields() -> PartialFields {
        PartialFields {
            store_name: Some("이마트파주점".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 3, 2),
            total_amount: Some(70950),
            vat_amount: Some(2053),
            payment_method: Some(PaymentMethod::CreditCard),
            card_number: Some("94400200**020".to_string()),
        }
    }

    #[test]
    fn test_into_complete() {
        let fields = complete_fields().into_complete().unwrap();
        assert_eq!(fields.total_amount, 70950);
        assert_eq!(fields.date.to_string(), "2025-03-02");
    }

    #[test]
    fn test_into_complete_reports_first_missing() {
        let mut fields = complete_fields();
        fields.card_number = None;
        fields.vat_amount = None;

        assert_eq!(fields.missing(), vec![Field::CardNumber, Field::VatAmount]);
        assert_eq!(
            fields.into_complete(),
            Err(ExtractionError::FieldNotFound(Field::CardNumber))
        );
    }

    #[test]
    fn test_retailer_parsing() {
        assert_eq!("emart".parse::<Retailer>(), Ok(Retailer::Emart));
        assert_eq!(" Traders ".parse::<Retailer>(), Ok(Retailer::Traders));
        assert!("costco".parse::<Retailer>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let receipt = ProcessedReceipt {
            raw_text: "raw".to_string(),
            processed_text: "processed".to_string(),
            retailer: Retailer::Emart,
            fields: complete_fields().into_complete().unwrap(),
            items: vec![ReceiptItem::new("리치버블카샴", 9800, 1)],
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["date"], "2025-03-02");
        assert_eq!(json["payment_method"], "credit card");
        assert_eq!(json["retailer"], "emart");
        assert_eq!(json["items"][0]["price"], 9800);
    }

    #[test]
    fn test_validate_flags_vat_above_total() {
        let mut fields = complete_fields().into_complete().unwrap();
        fields.vat_amount = 80000;
        let receipt = ProcessedReceipt {
            raw_text: String::new(),
            processed_text: String::new(),
            retailer: Retailer::Emart,
            fields,
            items: vec![ReceiptItem::new("햇반", 80000, 1)],
        };

        let issues = receipt.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("VAT"));
    }
}
