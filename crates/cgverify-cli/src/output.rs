//! Formatted output helpers for CLI commands.

use cgverify_harness::report::{CaseReport, Outcome, Report};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Formats one report row as an aligned, colored line.
#[must_use]
pub fn format_case_line(case: &CaseReport) -> String {
    let (tag, color, detail) = match &case.outcome {
        Outcome::Passed => ("PASS", GREEN, String::new()),
        Outcome::Failed { reason } => ("FAIL", RED, format!("  {reason}")),
        Outcome::Skipped { reason } => ("SKIP", YELLOW, format!("  {reason}")),
    };
    format!(
        "{color}{tag}{RESET} [{:<8}] {:<22} ({}){detail}",
        case.suite.to_string(),
        case.case,
        case.profile
    )
}

/// Formats the run summary line.
#[must_use]
pub fn format_summary(report: &Report) -> String {
    format!(
        "{} passed, {} failed, {} skipped ({} total)",
        report.passed(),
        report.failed(),
        report.skipped(),
        report.cases.len()
    )
}
