//! Outcome records handed to the presentation side.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::observed::ObservedProduct;

/// Result of looking an observed product up in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "entry", rename_all = "snake_case")]
pub enum CatalogMatch {
    Matched(CatalogEntry),
    NoMatch,
}

/// One comparison outcome per observed product.
///
/// The three states callers render differently:
/// - matched: `matched` is [`CatalogMatch::Matched`], `failed` is `false`;
/// - looked and found nothing: [`CatalogMatch::NoMatch`], `failed` is `false`;
/// - catalog unavailable: [`CatalogMatch::NoMatch`], `failed` is `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub original: ObservedProduct,
    #[serde(rename = "match")]
    pub matched: CatalogMatch,
    /// `max(0, original.price - entry.price)`; zero unless matched.
    pub savings: Decimal,
    pub failed: bool,
}

impl MatchResult {
    /// Builds a matched result, computing savings against `entry`.
    #[must_use]
    pub fn matched(original: ObservedProduct, entry: CatalogEntry) -> Self {
        let savings = (original.price - entry.price).max(Decimal::ZERO);
        Self {
            original,
            matched: CatalogMatch::Matched(entry),
            savings,
            failed: false,
        }
    }

    #[must_use]
    pub fn no_match(original: ObservedProduct) -> Self {
        Self {
            original,
            matched: CatalogMatch::NoMatch,
            savings: Decimal::ZERO,
            failed: false,
        }
    }

    /// Result for a product whose lookup could not run because the catalog
    /// was unavailable.
    #[must_use]
    pub fn lookup_failed(original: ObservedProduct) -> Self {
        Self {
            original,
            matched: CatalogMatch::NoMatch,
            savings: Decimal::ZERO,
            failed: true,
        }
    }

    #[must_use]
    pub fn entry(&self) -> Option<&CatalogEntry> {
        match &self.matched {
            CatalogMatch::Matched(entry) => Some(entry),
            CatalogMatch::NoMatch => None,
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.entry().is_some()
    }

    #[must_use]
    pub fn has_savings(&self) -> bool {
        self.savings > Decimal::ZERO
    }
}

/// All results for one extraction batch, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub results: Vec<MatchResult>,
    pub produced_at: DateTime<Utc>,
}

impl ComparisonReport {
    #[must_use]
    pub fn new(results: Vec<MatchResult>, produced_at: DateTime<Utc>) -> Self {
        Self {
            results,
            produced_at,
        }
    }

    /// Number of results with positive savings.
    #[must_use]
    pub fn savings_count(&self) -> usize {
        self.results.iter().filter(|r| r.has_savings()).count()
    }

    #[must_use]
    pub fn match_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_match()).count()
    }

    #[must_use]
    pub fn total_savings(&self) -> Decimal {
        self.results.iter().map(|r| r.savings).sum()
    }

    /// Returns `true` if the catalog lookup failed for this batch.
    #[must_use]
    pub fn lookup_failed(&self) -> bool {
        self.results.iter().any(|r| r.failed)
    }

    /// Badge indicator text: the savings count, or `None` when there is
    /// nothing to show.
    #[must_use]
    pub fn badge_text(&self) -> Option<String> {
        match self.savings_count() {
            0 => None,
            n => Some(n.to_string()),
        }
    }
}
