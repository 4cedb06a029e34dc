use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Attribute key carrying the catalog's canonical product name.
pub const NAME_ATTRIBUTE: &str = "Name";

/// Attribute key carrying the bottle size, e.g. `"750 ml"`.
pub const SIZE_ATTRIBUTE: &str = "Size";

/// One listing from the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-form listing attributes (`Name`, `Size`, `Age`, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Opaque external reference (an on-chain asset address), passed through
    /// verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
}

impl CatalogEntry {
    /// Returns `attributes["Name"]`, if present.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&str> {
        self.attributes.get(NAME_ATTRIBUTE).map(String::as_str)
    }

    /// Returns `attributes["Size"]`, if present.
    #[must_use]
    pub fn attribute_size(&self) -> Option<&str> {
        self.attributes.get(SIZE_ATTRIBUTE).map(String::as_str)
    }
}

/// The full catalog as of one fetch. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            fetched_at,
        }
    }

    /// Time elapsed between the fetch and `now`.
    #[must_use]
    pub fn age_at(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.fetched_at
    }

    /// Returns `true` while `now - fetched_at < ttl`.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.age_at(now) < ttl
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_at(fetched_at: DateTime<Utc>) -> CatalogSnapshot {
        CatalogSnapshot::new(Vec::new(), fetched_at)
    }

    #[test]
    fn fresh_just_before_ttl() {
        let fetched = Utc::now();
        let snap = snapshot_at(fetched);
        let ttl = TimeDelta::minutes(10);
        assert!(snap.is_fresh_at(fetched + ttl - TimeDelta::milliseconds(1), ttl));
    }

    #[test]
    fn stale_exactly_at_ttl() {
        let fetched = Utc::now();
        let snap = snapshot_at(fetched);
        let ttl = TimeDelta::minutes(10);
        assert!(!snap.is_fresh_at(fetched + ttl, ttl));
    }

    #[test]
    fn attribute_accessors_read_name_and_size() {
        let mut attributes = BTreeMap::new();
        attributes.insert("Name".to_owned(), "Old Forester 100 Proof".to_owned());
        attributes.insert("Size".to_owned(), "750 ml".to_owned());
        let entry = CatalogEntry {
            id: "abc".into(),
            name: "Old Forester".into(),
            price: Decimal::new(2750, 2),
            image_url: None,
            attributes,
            external_ref: None,
        };
        assert_eq!(entry.attribute_name(), Some("Old Forester 100 Proof"));
        assert_eq!(entry.attribute_size(), Some("750 ml"));
    }
}
