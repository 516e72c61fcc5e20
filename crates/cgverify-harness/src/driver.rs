//! Lifecycle drivers: the orchestration flows that run one scenario
//! against the runtime CLI and compare observed behavior with the
//! matrix expectations.
//!
//! Three flows exist: one-shot actions, resource-flag probes, and
//! persistent instances. The instance flow sequences start/exec/stop
//! and never touches an instance whose start reported failure.

use cgverify_common::config::HarnessConfig;
use cgverify_common::constants::{CGROUP_MOUNT_ROOT, EXIT_OK};
use cgverify_common::error::Result;
use cgverify_common::types::{CgroupVersion, InstanceHandle, Profile};
use cgverify_core::ident::NameSource;
use cgverify_core::invoke::{RunOutput, RuntimeCli};
use cgverify_core::probe::{self, HostPaths};

use crate::gate::{self, SkipReason};
use crate::matrix::{ActionCase, FlagCase, InstanceCase};
use crate::report::Outcome;

/// Runs a one-shot action scenario: apply limits, run, observe, done.
///
/// # Errors
///
/// Returns an error only if the runtime binary cannot be invoked.
pub fn run_action_case(cli: &RuntimeCli, case: &ActionCase) -> Result<Outcome> {
    tracing::info!(case = case.name, "action scenario");
    let out = cli.exec(&case.args)?;

    let mut failures = Vec::new();
    expect_exit("exec", case.exit, &out, &mut failures);
    expect_stderr("exec", case.error, &out, &mut failures);
    Ok(outcome_from(failures))
}

/// Runs a resource-flag scenario: apply the flag, probe the kernel state
/// from inside the container, and match the pseudo-file content for the
/// resolved hierarchy version. At most one version branch is evaluated.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked or the caller's own
/// cgroup membership cannot be read for the delegation gate.
pub fn run_flag_case(
    cli: &RuntimeCli,
    config: &HarnessConfig,
    host: &HostPaths,
    case: &FlagCase,
    profile: Profile,
    version: CgroupVersion,
) -> Result<Outcome> {
    tracing::info!(case = case.name, %version, "flag scenario");

    let (probe_cmd, expected) = match version {
        CgroupVersion::Legacy => {
            // Optional legacy resources are absent on some hosts.
            if !probe::resource_exists(host, case.controller_v1, case.resource_v1) {
                return Ok(skip(SkipReason::ResourceUnavailable(
                    format!("{}/{}", case.controller_v1, case.resource_v1),
                )));
            }
            (
                probe::legacy_probe(case.controller_v1, case.resource_v1),
                case.expect_v1,
            )
        }
        CgroupVersion::Unified => {
            if !gate::version_applies(case.skip_v2, version) {
                return Ok(skip(SkipReason::NoUnifiedEquivalent));
            }
            if !gate::delegation_applies(host, case.delegation_v2, profile, version)? {
                return Ok(skip(SkipReason::NotDelegated(
                    case.delegation_v2.to_string(),
                )));
            }
            (probe::unified_probe(case.resource_v2), case.expect_v2)
        }
    };

    let mut args = case.args.clone();
    if config.bind_cgroup_fs {
        args.push("-B".to_string());
        args.push(CGROUP_MOUNT_ROOT.to_string());
    }
    args.push(config.image.to_string_lossy().into_owned());
    args.push("/bin/sh".to_string());
    args.push("-c".to_string());
    args.push(probe_cmd);

    let out = cli.exec(&args)?;

    let mut failures = Vec::new();
    expect_exit("probe", case.exit, &out, &mut failures);
    if !expected.is_empty() && !out.stdout_contains(expected) {
        failures.push(format!(
            "probe output: expected to contain '{expected}', observed '{}'",
            out.stdout.trim()
        ));
    }
    Ok(outcome_from(failures))
}

/// Runs a persistent-instance scenario: start, exec, stop.
///
/// The exec and stop phases are suppressed whenever the start phase
/// reports a non-zero exit, since no instance exists to clean up. Once
/// an instance has started, stop is issued unconditionally and must
/// succeed, whatever happened during exec.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked or no instance
/// name can be generated.
pub fn run_instance_case(
    cli: &RuntimeCli,
    case: &InstanceCase,
    names: &mut dyn NameSource,
) -> Result<Outcome> {
    let handle = InstanceHandle::new(names.next_name()?);
    tracing::info!(case = case.name, instance = %handle.name(), "instance scenario");

    let start = cli.instance_start(&case.create_args, handle.name())?;

    let mut failures = Vec::new();
    expect_exit("start", case.start_exit, &start, &mut failures);
    expect_stderr("start", case.start_error, &start, &mut failures);

    if start.exit_code != EXIT_OK {
        // No instance came up; nothing to exec into or tear down.
        return Ok(outcome_from(failures));
    }

    if !case.exec_args.is_empty() {
        let mut exec_args = vec![handle.join_reference().to_string()];
        exec_args.extend_from_slice(&case.exec_args);
        let exec = cli.exec(&exec_args)?;
        expect_exit("exec", case.exec_exit, &exec, &mut failures);
        expect_stderr("exec", case.exec_error, &exec, &mut failures);
    }

    // Cleanup of a started instance must always succeed.
    let stop = cli.instance_stop(handle.name())?;
    expect_exit("stop", EXIT_OK, &stop, &mut failures);

    Ok(outcome_from(failures))
}

fn skip(reason: SkipReason) -> Outcome {
    tracing::info!(%reason, "scenario skipped");
    Outcome::Skipped {
        reason: reason.to_string(),
    }
}

fn expect_exit(phase: &str, expected: i32, out: &RunOutput, failures: &mut Vec<String>) {
    if out.exit_code != expected {
        failures.push(format!(
            "{phase} exit code: expected {expected}, observed {}",
            out.exit_code
        ));
    }
}

fn expect_stderr(
    phase: &str,
    needle: Option<&str>,
    out: &RunOutput,
    failures: &mut Vec<String>,
) {
    if let Some(needle) = needle {
        if !out.stderr_contains(needle) {
            failures.push(format!(
                "{phase} diagnostic: expected to contain '{needle}', observed '{}'",
                out.stderr.trim()
            ));
        }
    }
}

fn outcome_from(failures: Vec<String>) -> Outcome {
    if failures.is_empty() {
        Outcome::Passed
    } else {
        Outcome::Failed {
            reason: failures.join("; "),
        }
    }
}
