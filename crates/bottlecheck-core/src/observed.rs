//! Products observed on a retail listing page.
//!
//! The extraction pass (selector tables, DOM access) lives outside this
//! workspace; it hands over [`ObservedProduct`] records built through
//! [`ObservedProduct::new`], which applies the same validity filter the
//! extraction pass uses before a product is sent for comparison.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// A product scraped from a retail page during the current extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedProduct {
    pub name: String,
    /// Accepts a number, a numeric string, or a raw label like `"£32.99"`.
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    /// Raw volume label such as `"750ml"`, when the retailer shows one
    /// separately from the name.
    #[serde(default, alias = "volume", skip_serializing_if = "Option::is_none")]
    pub volume_text: Option<String>,
    /// Display name of the retailer the product was scraped from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retailer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ObservedProduct {
    /// Builds an observed product, rejecting records the comparison engine
    /// must never receive.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProduct`] if `name` is blank or `price` is
    /// not strictly positive.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        volume_text: Option<String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidProduct {
                name,
                reason: "name is empty".into(),
            });
        }
        if price <= Decimal::ZERO {
            return Err(CoreError::InvalidProduct {
                name,
                reason: format!("price must be positive, got {price}"),
            });
        }

        Ok(Self {
            name,
            price,
            volume_text: volume_text.filter(|v| !v.trim().is_empty()),
            retailer: None,
            url: None,
            image_url: None,
        })
    }

    /// Attaches the retailer display name.
    #[must_use]
    pub fn with_retailer(mut self, retailer: impl Into<String>) -> Self {
        self.retailer = Some(retailer.into());
        self
    }

    /// Attaches the product page URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns `true` if this record would pass [`ObservedProduct::new`].
    ///
    /// Records deserialized from JSON skip the constructor, so callers that
    /// accept them from outside should filter with this.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.price > Decimal::ZERO
    }
}

/// Extracts a numeric price from a retailer price label.
///
/// Takes the first run of digits (with `,` thousands separators and at most
/// one decimal point) and drops the separators:
/// `"$1,299.99"` → `1299.99`, `"£32.99 inc. VAT"` → `32.99`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPrice`] when the label contains no digits.
pub fn parse_price(label: &str) -> Result<Decimal, CoreError> {
    let bytes = label.as_bytes();
    let start = bytes
        .iter()
        .position(u8::is_ascii_digit)
        .ok_or_else(|| CoreError::InvalidPrice(label.to_owned()))?;

    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b',') {
        end += 1;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let digits: String = label[start..end].chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&digits).map_err(|_| CoreError::InvalidPrice(label.to_owned()))
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceField {
        Amount(Decimal),
        Label(String),
    }

    match PriceField::deserialize(deserializer)? {
        PriceField::Amount(amount) => Ok(amount),
        PriceField::Label(label) => parse_price(&label).map_err(serde::de::Error::custom),
    }
}
