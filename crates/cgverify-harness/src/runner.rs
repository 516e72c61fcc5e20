//! Sequential suite runner.
//!
//! The harness runs without PID-namespace isolation so that a systemd
//! cgroup manager can operate; leaked or concurrent child processes
//! would pollute the host process table. Execution is therefore
//! strictly sequential, one case and one phase at a time, and the
//! policy is an enforced object rather than an implicit absence of
//! threads.

use cgverify_common::config::HarnessConfig;
use cgverify_common::error::{CgverifyError, Result};
use cgverify_common::types::Profile;
use cgverify_core::ident::{NameSource, UuidNameSource};
use cgverify_core::invoke::RuntimeCli;
use cgverify_core::probe::HostPaths;
use cgverify_core::version;

use crate::driver;
use crate::gate::{self, SkipReason};
use crate::matrix;
use crate::report::{CaseReport, Outcome, Report, Suite};

/// Concurrency policy attached to a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPolicy {
    max_concurrency: usize,
}

impl ExecutionPolicy {
    /// The only policy the harness accepts: one case at a time.
    #[must_use]
    pub const fn sequential() -> Self {
        Self { max_concurrency: 1 }
    }

    /// Builds a policy with an arbitrary concurrency bound. The runner
    /// rejects anything other than 1; this exists so the constraint is
    /// testable rather than assumed.
    #[must_use]
    pub const fn with_concurrency(max_concurrency: usize) -> Self {
        Self { max_concurrency }
    }

    /// Maximum number of cases allowed to run at once.
    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self::sequential()
    }
}

/// Runs scenario suites against a runtime, strictly in order.
pub struct Runner {
    config: HarnessConfig,
    cli: RuntimeCli,
    host: HostPaths,
    names: Box<dyn NameSource>,
}

impl Runner {
    /// Creates a runner for the given configuration and policy.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the policy allows concurrency or the
    /// runtime binary is missing.
    pub fn new(config: HarnessConfig, policy: ExecutionPolicy) -> Result<Self> {
        if policy.max_concurrency() != 1 {
            return Err(CgverifyError::Config {
                message: format!(
                    "harness execution must be sequential; max_concurrency {} is not allowed",
                    policy.max_concurrency()
                ),
            });
        }
        config.validate()?;
        let cli = RuntimeCli::new(&config.runtime_bin);
        Ok(Self {
            config,
            cli,
            host: HostPaths::default(),
            names: Box::new(UuidNameSource),
        })
    }

    /// Replaces the instance name source, e.g. with a deterministic one
    /// under test.
    pub fn set_name_source(&mut self, names: Box<dyn NameSource>) {
        self.names = names;
    }

    /// Runs the given suites under each profile, in order.
    ///
    /// # Errors
    ///
    /// Returns an error on harness-internal faults only (invocation or
    /// kernel inspection failure); runtime divergence is recorded in the
    /// report.
    pub fn run(&mut self, profiles: &[Profile], suites: &[Suite]) -> Result<Report> {
        let mut report = Report::default();
        for &profile in profiles {
            for &suite in suites {
                match suite {
                    Suite::Instance => self.run_instance_suite(profile, &mut report)?,
                    Suite::Action => self.run_action_suite(profile, &mut report)?,
                    Suite::Flags => self.run_flag_suite(profile, &mut report)?,
                }
            }
        }
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "run complete"
        );
        Ok(report)
    }

    fn run_instance_suite(&mut self, profile: Profile, report: &mut Report) -> Result<()> {
        let mut cases = matrix::instance_cases(&self.config);
        if !profile.privileged() {
            // Rootless instance limits are categorically rejected; the
            // dedicated case asserts the diagnostic.
            cases = vec![matrix::rootless_instance_case(&self.config)];
        }
        for case in cases {
            let outcome = if gate::profile_applies(case.rootful, case.rootless, profile) {
                driver::run_instance_case(&self.cli, &case, self.names.as_mut())?
            } else {
                skipped(profile)
            };
            report.record(CaseReport {
                suite: Suite::Instance,
                case: case.name.to_string(),
                profile,
                outcome,
            });
        }
        Ok(())
    }

    fn run_action_suite(&mut self, profile: Profile, report: &mut Report) -> Result<()> {
        for case in matrix::action_cases(&self.config) {
            let outcome = if gate::profile_applies(case.rootful, case.rootless, profile) {
                driver::run_action_case(&self.cli, &case)?
            } else {
                skipped(profile)
            };
            report.record(CaseReport {
                suite: Suite::Action,
                case: case.name.to_string(),
                profile,
                outcome,
            });
        }
        Ok(())
    }

    fn run_flag_suite(&mut self, profile: Profile, report: &mut Report) -> Result<()> {
        // Resolved once; immutable for the whole run.
        let version = version::resolve()?;
        for case in matrix::flag_cases() {
            let outcome = driver::run_flag_case(
                &self.cli,
                &self.config,
                &self.host,
                &case,
                profile,
                version,
            )?;
            report.record(CaseReport {
                suite: Suite::Flags,
                case: case.name.to_string(),
                profile,
                outcome,
            });
        }
        Ok(())
    }
}

fn skipped(profile: Profile) -> Outcome {
    Outcome::Skipped {
        reason: SkipReason::ProfileMismatch(profile).to_string(),
    }
}
