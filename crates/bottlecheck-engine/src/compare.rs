//! Batch comparison: one catalog lookup, one result per observed product.

use bottlecheck_catalog::CatalogCache;
use bottlecheck_core::{CatalogSnapshot, ComparisonReport, MatchResult, ObservedProduct};
use chrono::{DateTime, Utc};

use crate::matcher::CatalogIndex;

/// Compares a batch of observed products against the cached catalog.
///
/// Never fails: if the catalog cannot be obtained every result is marked
/// `failed` with zero savings, so the caller can show an "unavailable" state
/// instead of "no savings". Results keep input order.
pub async fn compare_batch(cache: &CatalogCache, products: Vec<ObservedProduct>) -> ComparisonReport {
    compare_batch_at(cache, products, Utc::now()).await
}

/// [`compare_batch`] with an explicit clock reading, used both for the cache
/// TTL check and as the report timestamp.
pub async fn compare_batch_at(
    cache: &CatalogCache,
    products: Vec<ObservedProduct>,
    now: DateTime<Utc>,
) -> ComparisonReport {
    if products.is_empty() {
        return ComparisonReport::new(Vec::new(), now);
    }

    let results = match cache.get_snapshot_at(now).await {
        Ok(snapshot) => resolve_all(&products, &snapshot),
        Err(e) => {
            tracing::warn!(
                products = products.len(),
                error = %e,
                "catalog unavailable; marking batch as failed"
            );
            products.into_iter().map(MatchResult::lookup_failed).collect()
        }
    };

    let report = ComparisonReport::new(results, now);
    tracing::info!(
        products = report.results.len(),
        matches = report.match_count(),
        savings_count = report.savings_count(),
        failed = report.lookup_failed(),
        "batch compared"
    );
    report
}

/// Resolves every product against one snapshot, in input order.
#[must_use]
pub fn resolve_all(products: &[ObservedProduct], snapshot: &CatalogSnapshot) -> Vec<MatchResult> {
    let index = CatalogIndex::new(snapshot);
    products.iter().map(|p| index.resolve(p)).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::str::FromStr;

    use bottlecheck_core::CatalogEntry;
    use rust_decimal::Decimal;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn resolve_all_keeps_input_order() {
        let snapshot = CatalogSnapshot::new(
            vec![CatalogEntry {
                id: "ardbeg".into(),
                name: "Ardbeg 10".into(),
                price: dec("45"),
                image_url: None,
                attributes: BTreeMap::new(),
                external_ref: None,
            }],
            Utc::now(),
        );
        let products = vec![
            ObservedProduct::new("Unknown Gin", dec("30"), None).unwrap(),
            ObservedProduct::new("Ardbeg 10", dec("50"), None).unwrap(),
            ObservedProduct::new("Another Unknown", dec("30"), None).unwrap(),
        ];

        let results = resolve_all(&products, &snapshot);
        let names: Vec<_> = results.iter().map(|r| r.original.name.as_str()).collect();
        assert_eq!(names, ["Unknown Gin", "Ardbeg 10", "Another Unknown"]);
        let matched: Vec<_> = results.iter().map(MatchResult::is_match).collect();
        assert_eq!(matched, [false, true, false]);
    }
}
