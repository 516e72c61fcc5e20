//! Run reporting: per-case outcomes with skips distinct from failures.

use serde::{Deserialize, Serialize};

use cgverify_common::types::Profile;

/// Suite a case belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suite {
    /// Persistent-instance lifecycle scenarios.
    Instance,
    /// One-shot action scenarios.
    Action,
    /// Resource-flag verification scenarios.
    Flags,
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Action => write!(f, "action"),
            Self::Flags => write!(f, "flags"),
        }
    }
}

/// Result of one scenario under one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Observed behavior matched every expectation.
    Passed,
    /// Observed behavior diverged; the reason carries both expected and
    /// observed values.
    Failed {
        /// What diverged, with expected and observed values.
        reason: String,
    },
    /// The case was not applicable in this environment.
    Skipped {
        /// Why the case did not run.
        reason: String,
    },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "PASS"),
            Self::Failed { reason } => write!(f, "FAIL: {reason}"),
            Self::Skipped { reason } => write!(f, "SKIP: {reason}"),
        }
    }
}

/// One row of the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Suite the case belongs to.
    pub suite: Suite,
    /// Case name from the matrix.
    pub case: String,
    /// Profile the case ran under.
    pub profile: Profile,
    /// What happened.
    pub outcome: Outcome,
}

/// Aggregated results of a harness run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Per-case results in execution order.
    pub cases: Vec<CaseReport>,
}

impl Report {
    /// Appends one case result.
    pub fn record(&mut self, report: CaseReport) {
        self.cases.push(report);
    }

    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    /// Number of skipped cases.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    /// Whether any case failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.cases.iter().filter(|c| predicate(&c.outcome)).count()
    }
}
