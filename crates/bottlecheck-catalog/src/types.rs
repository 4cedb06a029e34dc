//! Response types for the catalog search endpoint.
//!
//! ## Observed shape
//!
//! The endpoint returns a bare JSON array of search hits:
//!
//! ```json
//! [{"_id": "…", "_source": {"name": "…", "price": 27.5, "imageUrl": "…",
//!   "attributes": {"Name": "…", "Size": "750 ml", "Age": 12},
//!   "nftAddress": "…"}}]
//! ```
//!
//! - `attributes` values are mostly strings but numeric values (`Age`,
//!   `Year`) appear too; they are stringified. `null`, arrays and objects are
//!   dropped.
//! - `attributes` itself may be absent or `null`.
//! - `name` is occasionally missing; it is treated as empty and the listing
//!   can then only match through `attributes.Name`.
//! - A hit without a usable `_id` or `price` is skipped with a warning rather
//!   than failing the whole catalog.

use std::collections::BTreeMap;

use bottlecheck_core::CatalogEntry;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FetchError;

/// One search hit.
#[derive(Debug, Deserialize)]
pub struct ListingHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: ListingSource,
}

/// The `_source` document of a search hit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSource {
    #[serde(default)]
    pub name: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub nft_address: Option<String>,
}

impl From<ListingHit> for CatalogEntry {
    fn from(hit: ListingHit) -> Self {
        let source = hit.source;
        let attributes = source
            .attributes
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| attribute_text(value).map(|text| (key, text)))
            .collect();

        CatalogEntry {
            id: hit.id,
            name: source.name.unwrap_or_default(),
            price: source.price,
            image_url: source.image_url.filter(|s| !s.is_empty()),
            attributes,
            external_ref: source.nft_address.filter(|s| !s.is_empty()),
        }
    }
}

fn attribute_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decodes a raw catalog response into entries, preserving response order.
///
/// # Errors
///
/// Returns [`FetchError::UnexpectedShape`] if `raw` is not a JSON array.
/// Individual malformed hits are skipped, not reported as errors.
pub fn decode_listings(raw: &serde_json::Value, context: &str) -> Result<Vec<CatalogEntry>, FetchError> {
    let hits = raw.as_array().ok_or_else(|| FetchError::UnexpectedShape {
        context: context.to_owned(),
    })?;

    let mut entries = Vec::with_capacity(hits.len());
    let mut skipped = 0usize;
    for (index, hit) in hits.iter().enumerate() {
        match ListingHit::deserialize(hit) {
            Ok(hit) => entries.push(CatalogEntry::from(hit)),
            Err(e) => {
                skipped += 1;
                tracing::debug!(index, error = %e, "skipping malformed catalog listing");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(
            context,
            skipped,
            kept = entries.len(),
            "catalog response contained malformed listings"
        );
    }

    Ok(entries)
}
