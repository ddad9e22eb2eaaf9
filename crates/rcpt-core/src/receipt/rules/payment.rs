//! Payment method and masked card number extraction.

use regex::Regex;

use crate::error::Field;
use crate::models::receipt::PaymentMethod;

use super::{tolerant_pattern, FieldExtractor};

/// Detects the card-payment label. Only its presence is read.
pub struct PaymentMethodExtractor {
    anchor: Regex,
}

impl PaymentMethodExtractor {
    pub fn new(label: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            anchor: Regex::new(&tolerant_pattern(label))?,
        })
    }
}

impl FieldExtractor for PaymentMethodExtractor {
    type Output = PaymentMethod;

    fn field(&self) -> Field {
        Field::PaymentMethod
    }

    fn extract(&self, text: &str) -> Option<PaymentMethod> {
        self.anchor
            .is_match(text)
            .then_some(PaymentMethod::CreditCard)
    }
}

/// Matches one known masked card number exactly, e.g. `94400200**020`.
pub struct CardNumberExtractor {
    anchor: Regex,
}

impl CardNumberExtractor {
    pub fn new(masked: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            anchor: Regex::new(&regex::escape(masked))?,
        })
    }
}

impl FieldExtractor for CardNumberExtractor {
    type Output = String;

    fn field(&self) -> Field {
        Field::CardNumber
    }

    fn extract(&self, text: &str) -> Option<String> {
        self.anchor.find(text).map(|m| m.as_str().to_string())
    }
}
