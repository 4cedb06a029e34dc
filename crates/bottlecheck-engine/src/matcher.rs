//! Observed-product to catalog-entry matching.
//!
//! A candidate is accepted when its name matches and, if the observed product
//! carries a volume, its `Size` attribute parses to the same volume. The first
//! accepted entry in catalog order wins; there is no scoring.
//!
//! Name matching is substring containment in either direction between base
//! names (normalized, trailing volume stripped), checked against both the
//! entry's `name` and its `Name` attribute. Empty catalog names never take
//! part, since every string contains the empty string.

use bottlecheck_core::{CatalogEntry, CatalogSnapshot, MatchResult, ObservedProduct};

use crate::normalize::{base_name, normalize_name};
use crate::volume::{parse_volume, Millilitres};

/// Derived comparison keys for one catalog entry.
#[derive(Debug)]
struct IndexedEntry<'a> {
    entry: &'a CatalogEntry,
    base_name: Option<String>,
    attribute_base_name: Option<String>,
    volume: Option<Millilitres>,
}

impl<'a> IndexedEntry<'a> {
    fn new(entry: &'a CatalogEntry) -> Self {
        Self {
            entry,
            base_name: comparable_base_name(&entry.name),
            attribute_base_name: entry.attribute_name().and_then(comparable_base_name),
            volume: entry.attribute_size().and_then(parse_volume),
        }
    }

    fn name_matches(&self, observed: &str) -> bool {
        [&self.base_name, &self.attribute_base_name]
            .into_iter()
            .flatten()
            .any(|candidate| candidate.contains(observed) || observed.contains(candidate.as_str()))
    }

    fn accepts(&self, observed: &ObservedKey) -> bool {
        if !self.name_matches(&observed.base_name) {
            return false;
        }
        match observed.volume {
            None => true,
            Some(volume) => self.volume == Some(volume),
        }
    }
}

/// Comparison keys for an observed product.
#[derive(Debug)]
struct ObservedKey {
    base_name: String,
    volume: Option<Millilitres>,
}

impl ObservedKey {
    fn new(observed: &ObservedProduct) -> Self {
        let normalized = normalize_name(&observed.name);
        // The name is the primary volume source; retailers that print the
        // size separately fill `volume_text` instead.
        let volume = parse_volume(&normalized).or_else(|| {
            observed
                .volume_text
                .as_deref()
                .and_then(parse_volume)
        });
        Self {
            base_name: base_name(&normalized),
            volume,
        }
    }
}

fn comparable_base_name(raw: &str) -> Option<String> {
    Some(base_name(&normalize_name(raw))).filter(|name| !name.is_empty())
}

/// A catalog snapshot with per-entry comparison keys computed once, for
/// resolving many observed products against the same snapshot.
#[derive(Debug)]
pub struct CatalogIndex<'a> {
    entries: Vec<IndexedEntry<'a>>,
}

impl<'a> CatalogIndex<'a> {
    #[must_use]
    pub fn new(snapshot: &'a CatalogSnapshot) -> Self {
        Self::from_entries(&snapshot.entries)
    }

    #[must_use]
    pub fn from_entries(entries: &'a [CatalogEntry]) -> Self {
        Self {
            entries: entries.iter().map(IndexedEntry::new).collect(),
        }
    }

    /// The first entry, in catalog order, that `observed` accepts.
    #[must_use]
    pub fn find(&self, observed: &ObservedProduct) -> Option<&'a CatalogEntry> {
        let key = ObservedKey::new(observed);
        if key.base_name.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|indexed| indexed.accepts(&key))
            .map(|indexed| indexed.entry)
    }

    /// Resolves `observed` into a [`MatchResult`].
    #[must_use]
    pub fn resolve(&self, observed: &ObservedProduct) -> MatchResult {
        match self.find(observed) {
            Some(entry) => {
                tracing::trace!(observed = %observed.name, entry_id = %entry.id, "catalog match");
                MatchResult::matched(observed.clone(), entry.clone())
            }
            None => MatchResult::no_match(observed.clone()),
        }
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

/// Matches one observed product against `snapshot`.
///
/// Pure and total: an unmatched product yields a `NoMatch` result, never an
/// error. For batches, build a [`CatalogIndex`] once instead.
#[must_use]
pub fn match_product(observed: &ObservedProduct, snapshot: &CatalogSnapshot) -> MatchResult {
    CatalogIndex::new(snapshot).resolve(observed)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::str::FromStr;

    use bottlecheck_core::CatalogMatch;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(id: &str, name: &str, price: &str, attrs: &[(&str, &str)]) -> CatalogEntry {
        CatalogEntry {
            id: id.to_owned(),
            name: name.to_owned(),
            price: dec(price),
            image_url: None,
            attributes: attrs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<BTreeMap<_, _>>(),
            external_ref: None,
        }
    }

    fn observed(name: &str, price: &str) -> ObservedProduct {
        ObservedProduct::new(name, dec(price), None).unwrap()
    }

    fn snapshot(entries: Vec<CatalogEntry>) -> CatalogSnapshot {
        CatalogSnapshot::new(entries, Utc::now())
    }

    #[test]
    fn end_to_end_volume_stripped_match() {
        let snap = snapshot(vec![entry(
            "of",
            "Old Forester 100 Proof",
            "27.50",
            &[("Size", "750 ml")],
        )]);
        let result = match_product(&observed("Old Forester 100 Proof 750ml", "32.99"), &snap);
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("of"));
        assert_eq!(result.savings, dec("5.49"));
        assert!(!result.failed);
    }

    #[test]
    fn volume_mismatch_blocks_match() {
        let snap = snapshot(vec![entry("p", "Product", "10", &[("Size", "70cl")])]);
        let result = match_product(&observed("Product 750ml", "20"), &snap);
        assert_eq!(result.matched, CatalogMatch::NoMatch);
        assert_eq!(result.savings, Decimal::ZERO);
        assert!(!result.failed);
    }

    #[test]
    fn suffixed_unit_spelling_still_blocks_size_mismatch() {
        let snap = snapshot(vec![entry(
            "small",
            "Tito's Handmade Vodka",
            "20",
            &[("Size", "750 ml")],
        )]);
        let result = match_product(&observed("Tito's Handmade Vodka 1.75Ltr", "35"), &snap);
        assert_eq!(result.matched, CatalogMatch::NoMatch);
        assert_eq!(result.savings, Decimal::ZERO);
    }

    #[test]
    fn suffixed_unit_spelling_matches_same_size() {
        let snap = snapshot(vec![
            entry("small", "Tito's Handmade Vodka", "20", &[("Size", "750 ml")]),
            entry("handle", "Tito's Handmade Vodka", "30", &[("Size", "1.75 l")]),
        ]);
        let result = match_product(&observed("Tito's Handmade Vodka 1.75Ltr", "35"), &snap);
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("handle"));
        assert_eq!(result.savings, dec("5"));
    }

    #[test]
    fn unknown_candidate_volume_cannot_satisfy_known_volume() {
        let snap = snapshot(vec![entry("p", "Product", "10", &[])]);
        assert!(!match_product(&observed("Product 750ml", "20"), &snap).is_match());
    }

    #[test]
    fn observed_without_volume_ignores_candidate_volume() {
        let snap = snapshot(vec![
            entry("a", "Buffalo Trace Bourbon", "25", &[("Size", "1.75l")]),
            entry("b", "Buffalo Trace Bourbon", "20", &[]),
        ]);
        let result = match_product(&observed("Buffalo Trace", "30"), &snap);
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("a"));
    }

    #[test]
    fn first_acceptable_entry_wins() {
        let snap = snapshot(vec![
            entry("expensive", "Eagle Rare 10", "60", &[]),
            entry("cheap", "Eagle Rare 10", "30", &[]),
        ]);
        let result = match_product(&observed("Eagle Rare 10", "50"), &snap);
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("expensive"));
        assert_eq!(result.savings, Decimal::ZERO);
    }

    #[test]
    fn containment_works_in_both_directions() {
        let longer_catalog = snapshot(vec![entry("x", "Blanton's Single Barrel Bourbon", "80", &[])]);
        assert!(match_product(&observed("Blanton's Single Barrel", "90"), &longer_catalog).is_match());

        let shorter_catalog = snapshot(vec![entry("y", "Blanton's", "80", &[])]);
        assert!(match_product(&observed("Blanton's Single Barrel", "90"), &shorter_catalog).is_match());
    }

    #[test]
    fn attribute_name_is_a_second_candidate() {
        let snap = snapshot(vec![entry(
            "z",
            "Lot #42",
            "55",
            &[("Name", "Weller Special Reserve"), ("Size", "750ml")],
        )]);
        let result = match_product(&observed("WELLER  Special Reserve 750 ML", "70"), &snap);
        assert_eq!(result.savings, dec("15"));
    }

    #[test]
    fn empty_catalog_names_never_match_everything() {
        let snap = snapshot(vec![entry("blank", "", "1", &[])]);
        assert!(!match_product(&observed("Anything At All", "10"), &snap).is_match());
    }

    #[test]
    fn volume_text_supplies_volume_when_name_has_none() {
        let snap = snapshot(vec![
            entry("big", "Ardbeg 10", "70", &[("Size", "1l")]),
            entry("std", "Ardbeg 10", "45", &[("Size", "70cl")]),
        ]);
        let product = ObservedProduct::new("Ardbeg 10", dec("50"), Some("70cl".into())).unwrap();
        let result = match_product(&product, &snap);
        assert_eq!(result.entry().map(|e| e.id.as_str()), Some("std"));
        assert_eq!(result.savings, dec("5"));
    }

    #[test]
    fn empty_catalog_yields_no_match() {
        let snap = snapshot(Vec::new());
        let result = match_product(&observed("Ardbeg 10", "50"), &snap);
        assert_eq!(result.matched, CatalogMatch::NoMatch);
    }

    #[test]
    fn index_reuses_keys_across_products() {
        let entries = vec![
            entry("a", "Ardbeg 10", "45", &[("Size", "70cl")]),
            entry("b", "Eagle Rare 10", "30", &[("Size", "750ml")]),
        ];
        let index = CatalogIndex::from_entries(&entries);
        assert_eq!(index.len(), 2);
        assert_eq!(index.find(&observed("Eagle Rare 10 750ml", "40")).map(|e| e.id.as_str()), Some("b"));
        assert_eq!(index.find(&observed("Ardbeg 10 70cl", "40")).map(|e| e.id.as_str()), Some("a"));
        assert!(index.find(&observed("Ardbeg 10 1l", "40")).is_none());
    }
}
