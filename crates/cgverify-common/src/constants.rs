//! System-wide constants: kernel paths, fixture names, and the exit codes
//! the runtime under test is expected to produce.

/// Mount root of the host cgroup filesystem, shared by both hierarchy
/// models. Legacy mounts one controller per subdirectory; unified mounts
/// everything directly here.
pub const CGROUP_MOUNT_ROOT: &str = "/sys/fs/cgroup";

/// Self-referential cgroup membership descriptor of the reading process.
pub const PROC_SELF_CGROUP: &str = "/proc/self/cgroup";

/// Default directory holding the runtime-owned cgroup limit fixtures.
pub const DEFAULT_FIXTURE_DIR: &str = "testdata/cgroups";

/// Fixture referencing a path that does not exist.
pub const FIXTURE_NONEXISTENT: &str = "doesnotexist.toml";
/// Fixture containing syntactically invalid TOML.
pub const FIXTURE_INVALID: &str = "invalid.toml";
/// Fixture requesting a 500M hard memory limit.
pub const FIXTURE_MEMORY_LIMIT: &str = "memory_limit.toml";
/// Fixture requesting a satisfiable CPU quota.
pub const FIXTURE_CPU_SUCCESS: &str = "cpu_success.toml";
/// Fixture denying access to a device node.
pub const FIXTURE_DENY_DEVICE: &str = "deny_device.toml";

/// Runtime exit code for success.
pub const EXIT_OK: i32 = 0;
/// Runtime exit code for a generic permission denial.
pub const EXIT_PERMISSION_DENIED: i32 = 1;
/// Runtime exit code for an out-of-memory kill (128 + SIGKILL).
pub const EXIT_OOM_KILLED: i32 = 137;
/// Runtime exit code for a CLI-level fatal error.
pub const EXIT_CLI_FATAL: i32 = 255;

/// Application name used in CLI output.
pub const APP_NAME: &str = "cgverify";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "cgverify";
