//! Product name normalization.

use std::sync::LazyLock;

use regex::Regex;

/// A volume phrase at the very end of an already-normalized name, optionally
/// wrapped in parentheses: `" 750ml"`, `" 1.75 ltr"`, `" (70cl)"`.
static TRAILING_VOLUME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+\(?\d+(?:\.\d+)?\s*(?:ml|cl|litre|liter|l)(?:s|tr|trs)?\)?$")
        .expect("valid trailing volume regex")
});

/// Lower-cases, trims, and collapses internal whitespace runs to one space.
///
/// Idempotent: normalizing a normalized name returns it unchanged.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strips a trailing volume phrase from a normalized name so that
/// `"old forester 100 proof 750ml"` compares as `"old forester 100 proof"`.
#[must_use]
pub fn base_name(normalized: &str) -> String {
    TRAILING_VOLUME_RE
        .replace(normalized, "")
        .trim()
        .to_owned()
}
