//! End-to-end tests for the lifecycle drivers and runner.
//!
//! A stub runtime shell script stands in for the container runtime under
//! test, logging every invocation so that sequencing and cleanup
//! invariants can be asserted without containers or kernel cgroups.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use cgverify_common::config::HarnessConfig;
use cgverify_common::types::{CgroupVersion, Profile};
use cgverify_core::invoke::RuntimeCli;
use cgverify_core::probe::HostPaths;
use cgverify_harness::driver;
use cgverify_harness::matrix;
use cgverify_harness::report::{Outcome, Suite};
use cgverify_harness::runner::{ExecutionPolicy, Runner};

/// Writes an executable stub runtime that logs `"$@"` to `log` before
/// running `body`.
fn stub_runtime(dir: &Path, log: &Path, body: &str) -> PathBuf {
    let path = dir.join("runtime.sh");
    let script = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\n{body}\n", log.display());
    fs::write(&path, script).expect("write stub runtime");
    let mut perms = fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

fn logged_lines(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(ToString::to_string)
        .collect()
}

fn config_for(runtime: &Path) -> HarnessConfig {
    let mut config = HarnessConfig::new(runtime, "/tmp/test-image.sif");
    config.bind_cgroup_fs = false;
    config
}

/// Points the host-side kernel interface at fixture files so that
/// availability and delegation gates can be driven without real cgroups.
fn host_paths(dir: &Path, proc_content: &str) -> HostPaths {
    let proc_cgroup = dir.join("proc_cgroup");
    fs::write(&proc_cgroup, proc_content).expect("write proc fixture");
    let cgroup_root = dir.join("cgroup");
    fs::create_dir_all(&cgroup_root).expect("create cgroup root");
    HostPaths {
        cgroup_root,
        proc_cgroup,
    }
}

/// Stub behavior mimicking a correct runtime for every matrix case.
const WELL_BEHAVED: &str = r#"
case "$1" in
instance)
    if [ "$2" = "start" ]; then
        case "$*" in
        *doesnotexist*) echo "open: no such file or directory" >&2; exit 255 ;;
        *invalid*) echo "toml parsing error" >&2; exit 255 ;;
        *memory_limit*) exit 255 ;;
        *) exit 0 ;;
        esac
    fi
    exit 0
    ;;
exec)
    case "$*" in
    *doesnotexist*) echo "open: no such file or directory" >&2; exit 255 ;;
    *invalid*) echo "toml parsing error" >&2; exit 255 ;;
    *memory_limit*) exit 137 ;;
    */dev/null*) echo "cat: /dev/null: Operation not permitted" >&2; exit 1 ;;
    *) exit 0 ;;
    esac
    ;;
esac
"#;

#[test]
fn harness_failed_start_suppresses_exec_and_stop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, WELL_BEHAVED);
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let case = matrix::instance_cases(&config)
        .into_iter()
        .find(|c| c.name == "nonexistent toml")
        .expect("case");
    let mut names = cgverify_core::ident::UuidNameSource;
    let outcome = driver::run_instance_case(&cli, &case, &mut names).expect("drive");

    assert_eq!(outcome, Outcome::Passed);
    let lines = logged_lines(&log);
    assert_eq!(lines.len(), 1, "only the start phase may run: {lines:?}");
    assert!(lines[0].starts_with("instance start"));
}

#[test]
fn harness_successful_start_runs_exec_then_stop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, WELL_BEHAVED);
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let case = matrix::instance_cases(&config)
        .into_iter()
        .find(|c| c.name == "cpu success")
        .expect("case");
    let mut names = cgverify_core::ident::UuidNameSource;
    let outcome = driver::run_instance_case(&cli, &case, &mut names).expect("drive");

    assert_eq!(outcome, Outcome::Passed);
    let lines = logged_lines(&log);
    assert_eq!(lines.len(), 3, "start, exec, stop: {lines:?}");
    assert!(lines[0].starts_with("instance start"));
    assert!(lines[1].starts_with("exec instance://"));
    assert!(lines[2].starts_with("instance stop"));
}

#[test]
fn harness_stop_is_issued_even_when_exec_fails_as_expected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, WELL_BEHAVED);
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    // Device deny: exec is expected to exit 1, stop must still run.
    let case = matrix::instance_cases(&config)
        .into_iter()
        .find(|c| c.name == "device deny")
        .expect("case");
    let mut names = cgverify_core::ident::UuidNameSource;
    let outcome = driver::run_instance_case(&cli, &case, &mut names).expect("drive");

    assert_eq!(outcome, Outcome::Passed);
    let lines = logged_lines(&log);
    assert!(
        lines.last().expect("stop line").starts_with("instance stop"),
        "cleanup must close the lifecycle: {lines:?}"
    );
}

#[test]
fn harness_action_mismatch_reports_expected_and_observed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    // A runtime that never enforces the memory limit.
    let runtime = stub_runtime(dir.path(), &log, "exit 0");
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let case = matrix::action_cases(&config)
        .into_iter()
        .find(|c| c.name == "memory limit")
        .expect("case");
    let outcome = driver::run_action_case(&cli, &case).expect("drive");

    match outcome {
        Outcome::Failed { reason } => {
            assert!(reason.contains("expected 137"), "{reason}");
            assert!(reason.contains("observed 0"), "{reason}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn harness_flag_probe_matches_unified_expectation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, "echo 'default 50'\nexit 0");
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let case = matrix::flag_cases()
        .into_iter()
        .find(|c| c.name == "blkio-weight")
        .expect("case");
    // Privileged profile: the delegation axis never consults the kernel.
    let host = HostPaths::default();
    let outcome = driver::run_flag_case(
        &cli,
        &config,
        &host,
        &case,
        Profile::Root,
        CgroupVersion::Unified,
    )
    .expect("drive");

    assert_eq!(outcome, Outcome::Passed);
    let lines = logged_lines(&log);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("--blkio-weight 50"));
    assert!(lines[0].contains("io.bfq.weight"), "probe targets the v2 file");
}

#[test]
fn harness_flag_without_unified_equivalent_is_skipped_unrun() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, "exit 0");
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let case = matrix::flag_cases()
        .into_iter()
        .find(|c| c.name == "oom-kill-disable")
        .expect("case");
    let host = HostPaths::default();
    let outcome = driver::run_flag_case(
        &cli,
        &config,
        &host,
        &case,
        Profile::User,
        CgroupVersion::Unified,
    )
    .expect("drive");

    assert!(matches!(outcome, Outcome::Skipped { .. }), "{outcome:?}");
    assert!(logged_lines(&log).is_empty(), "skipped cases must not invoke the runtime");
}

#[test]
fn harness_flag_with_absent_legacy_resource_is_skipped_unrun() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, "echo '524288000'\nexit 0");
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    // A memory hierarchy exists, but the resource file does not.
    let host = host_paths(dir.path(), "7:memory:/grp\n");
    fs::create_dir_all(host.cgroup_root.join("memory/grp")).expect("create cgroup dir");

    let case = matrix::flag_cases()
        .into_iter()
        .find(|c| c.name == "memory")
        .expect("case");
    let outcome = driver::run_flag_case(
        &cli,
        &config,
        &host,
        &case,
        Profile::Root,
        CgroupVersion::Legacy,
    )
    .expect("drive");

    match outcome {
        Outcome::Skipped { reason } => {
            assert!(reason.contains("memory/memory.limit_in_bytes"), "{reason}");
        }
        other => panic!("expected skip, got {other:?}"),
    }
    assert!(logged_lines(&log).is_empty(), "skipped cases must not invoke the runtime");
}

#[test]
fn harness_flag_with_present_legacy_resource_runs_the_probe() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, "echo '524288000'\nexit 0");
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let host = host_paths(dir.path(), "7:memory:/grp\n");
    let grp = host.cgroup_root.join("memory/grp");
    fs::create_dir_all(&grp).expect("create cgroup dir");
    fs::write(grp.join("memory.limit_in_bytes"), "524288000\n").expect("write resource");

    let case = matrix::flag_cases()
        .into_iter()
        .find(|c| c.name == "memory")
        .expect("case");
    let outcome = driver::run_flag_case(
        &cli,
        &config,
        &host,
        &case,
        Profile::Root,
        CgroupVersion::Legacy,
    )
    .expect("drive");

    assert_eq!(outcome, Outcome::Passed);
    let lines = logged_lines(&log);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("--memory 500M"));
    assert!(lines[0].contains("memory.limit_in_bytes"), "probe targets the v1 file");
}

#[test]
fn harness_flag_on_undelegated_controller_is_skipped_unrun() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, "echo '524288000'\nexit 0");
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let host = host_paths(dir.path(), "0::/grp\n");
    let grp = host.cgroup_root.join("grp");
    fs::create_dir_all(&grp).expect("create cgroup dir");
    fs::write(grp.join("cgroup.controllers"), "cpu pids\n").expect("write controllers");

    let case = matrix::flag_cases()
        .into_iter()
        .find(|c| c.name == "memory")
        .expect("case");
    let outcome = driver::run_flag_case(
        &cli,
        &config,
        &host,
        &case,
        Profile::User,
        CgroupVersion::Unified,
    )
    .expect("drive");

    match outcome {
        Outcome::Skipped { reason } => {
            assert!(reason.contains("'memory'"), "{reason}");
        }
        other => panic!("expected skip, got {other:?}"),
    }
    assert!(logged_lines(&log).is_empty(), "skipped cases must not invoke the runtime");
}

#[test]
fn harness_flag_on_delegated_controller_runs_the_probe() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, "echo '524288000'\nexit 0");
    let cli = RuntimeCli::new(&runtime);
    let config = config_for(&runtime);

    let host = host_paths(dir.path(), "0::/grp\n");
    let grp = host.cgroup_root.join("grp");
    fs::create_dir_all(&grp).expect("create cgroup dir");
    fs::write(grp.join("cgroup.controllers"), "cpu memory pids\n").expect("write controllers");

    let case = matrix::flag_cases()
        .into_iter()
        .find(|c| c.name == "memory")
        .expect("case");
    let outcome = driver::run_flag_case(
        &cli,
        &config,
        &host,
        &case,
        Profile::User,
        CgroupVersion::Unified,
    )
    .expect("drive");

    assert_eq!(outcome, Outcome::Passed);
    let lines = logged_lines(&log);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("memory.max"), "probe targets the v2 file");
}

#[test]
fn harness_runner_sequences_root_suites_and_skips_rootless_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, WELL_BEHAVED);
    let config = config_for(&runtime);

    let mut runner = Runner::new(config, ExecutionPolicy::sequential()).expect("runner");
    let report = runner
        .run(&[Profile::Root], &[Suite::Instance, Suite::Action])
        .expect("run");

    assert!(!report.has_failures(), "{:#?}", report.cases);
    // "device ignored" is the only rootless-exclusive row under Root.
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.passed(), report.cases.len() - 1);

    // Every started instance gets a distinct generated name.
    let names: Vec<String> = logged_lines(&log)
        .into_iter()
        .filter(|l| l.starts_with("instance start"))
        .map(|l| l.split_whitespace().last().expect("name").to_string())
        .collect();
    let unique = names.len();
    let mut sorted = names;
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), unique, "instance names must be pairwise distinct");
}

/// Deterministic name source for reproducing instance orderings.
struct CountingNames(u32);

impl cgverify_core::ident::NameSource for CountingNames {
    fn next_name(&mut self) -> cgverify_common::error::Result<cgverify_common::types::InstanceName> {
        self.0 += 1;
        Ok(cgverify_common::types::InstanceName::new(format!(
            "case-{:04}",
            self.0
        )))
    }
}

#[test]
fn harness_runner_accepts_a_substituted_name_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let runtime = stub_runtime(dir.path(), &log, WELL_BEHAVED);
    let config = config_for(&runtime);

    let mut runner = Runner::new(config, ExecutionPolicy::sequential()).expect("runner");
    runner.set_name_source(Box::new(CountingNames(0)));
    let report = runner.run(&[Profile::Root], &[Suite::Instance]).expect("run");

    assert!(!report.has_failures(), "{:#?}", report.cases);
    let starts: Vec<String> = logged_lines(&log)
        .into_iter()
        .filter(|l| l.starts_with("instance start"))
        .collect();
    assert!(starts[0].ends_with("case-0001"), "{}", starts[0]);
    assert!(starts[1].ends_with("case-0002"), "{}", starts[1]);
}

#[test]
fn harness_rootless_instance_limits_are_rejected_with_diagnostic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("calls.log");
    let body = r#"
if [ "$1 $2" = "instance start" ]; then
    echo "FATAL: Instances do not currently support rootless cgroups" >&2
    exit 255
fi
exit 0
"#;
    let runtime = stub_runtime(dir.path(), &log, body);
    let config = config_for(&runtime);

    let mut runner = Runner::new(config, ExecutionPolicy::sequential()).expect("runner");
    let report = runner.run(&[Profile::User], &[Suite::Instance]).expect("run");

    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.cases[0].case, "rootless rejected");
    assert_eq!(report.cases[0].outcome, Outcome::Passed);
    // The rejection happens at start; no instance exists to tear down.
    assert_eq!(logged_lines(&log).len(), 1);
}
