//! CLI output formatting.

use crate::verification::{CheckResult, VerificationReport};

/// One line describing a check result.
#[must_use]
pub fn format_check(result: &CheckResult) -> String {
    let symbol = if result.passed { "✓" } else { "✗" };
    let seed = result
        .seed
        .map_or_else(String::new, |seed| format!(" seed {seed}"));
    format!(
        "{symbol} [{:?}] {}{seed} {}: {} (actual {}, expected {})",
        result.severity, result.algorithm, result.id, result.message, result.actual, result.expected
    )
}

/// Closing summary of a verification run.
#[must_use]
pub fn format_summary(report: &VerificationReport, first_seed: u64, seeds: u64) -> String {
    let status = if report.is_verified() { "VERIFIED" } else { "FAILED" };
    let last_seed = first_seed.wrapping_add(seeds.saturating_sub(1));
    format!(
        "{status}: {}/{} checks passed over seeds {first_seed}..={last_seed}",
        report.passed(),
        report.total()
    )
}
