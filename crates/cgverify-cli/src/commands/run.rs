//! `cgverify run` — Execute the scenario matrix against a runtime.

use std::path::PathBuf;

use clap::Args;

use cgverify_common::config::HarnessConfig;
use cgverify_common::types::Profile;
use cgverify_harness::report::Suite;
use cgverify_harness::runner::{ExecutionPolicy, Runner};

use crate::commands::{ProfileArg, SuiteArg};
use crate::output;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the runtime binary under test.
    #[arg(long)]
    pub runtime: PathBuf,

    /// Path to the container image scenarios run against.
    #[arg(long)]
    pub image: PathBuf,

    /// Directory holding the cgroup limit fixtures.
    #[arg(long, default_value = cgverify_common::constants::DEFAULT_FIXTURE_DIR)]
    pub fixtures: PathBuf,

    /// Profiles to run under (repeatable).
    #[arg(long = "profile", value_enum, default_values_t = [ProfileArg::Root])]
    pub profiles: Vec<ProfileArg>,

    /// Suites to run (repeatable).
    #[arg(
        long = "suite",
        value_enum,
        default_values_t = [SuiteArg::Instance, SuiteArg::Action, SuiteArg::Flags]
    )]
    pub suites: Vec<SuiteArg>,

    /// Emit the report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `run` command.
///
/// # Errors
///
/// Returns an error if the harness cannot run, or if any scenario case
/// failed (so the process exits non-zero).
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let mut config = HarnessConfig::new(args.runtime, args.image);
    config.fixture_dir = args.fixtures;

    let profiles: Vec<Profile> = args.profiles.iter().copied().map(Into::into).collect();
    let suites: Vec<Suite> = args.suites.iter().copied().map(Into::into).collect();
    tracing::info!(
        runtime = %config.runtime_bin.display(),
        profiles = profiles.len(),
        suites = suites.len(),
        "starting scenario run"
    );

    let mut runner = Runner::new(config, ExecutionPolicy::sequential())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let report = runner
        .run(&profiles, &suites)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for case in &report.cases {
            println!("{}", output::format_case_line(case));
        }
        println!();
        println!("{}", output::format_summary(&report));
    }

    if report.has_failures() {
        anyhow::bail!("{} scenario case(s) failed", report.failed());
    }
    Ok(())
}
