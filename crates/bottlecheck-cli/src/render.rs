//! Plain-text rendering of reports for the terminal.

use std::fmt::Write as _;

use bottlecheck_catalog::CacheStatus;
use bottlecheck_core::{ComparisonReport, MatchResult};

pub(crate) fn report_table(report: &ComparisonReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        let _ = writeln!(out, "{}", result_line(result));
    }

    if report.lookup_failed() {
        let _ = writeln!(out, "catalog unavailable; no comparison possible");
    } else {
        let _ = writeln!(
            out,
            "{} of {} matched, {} with savings (total {})",
            report.match_count(),
            report.results.len(),
            report.savings_count(),
            report.total_savings()
        );
    }
    if let Some(badge) = report.badge_text() {
        let _ = writeln!(out, "badge: {badge}");
    }
    out
}

fn result_line(result: &MatchResult) -> String {
    let original = &result.original;
    if result.failed {
        return format!("{} @ {}: lookup failed", original.name, original.price);
    }
    match result.entry() {
        Some(entry) => format!(
            "{} @ {}: {} @ {} (save {})",
            original.name, original.price, entry.name, entry.price, result.savings
        ),
        None => format!("{} @ {}: no match", original.name, original.price),
    }
}

pub(crate) fn status_lines(status: &CacheStatus) -> String {
    format!(
        "entries: {}\nfetched at: {}\nage: {}s\nfresh: {}\n",
        status.entries,
        status.fetched_at.to_rfc3339(),
        status.age.num_seconds(),
        status.fresh
    )
}
