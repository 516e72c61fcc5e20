//! Cgroup hierarchy model detection.
//!
//! The host's mounting mode is read once and cached for the lifetime of
//! the process; scenarios are routed by the resolved value and may never
//! assume the mode can change mid-run.

use std::sync::OnceLock;

use cgverify_common::error::Result;
use cgverify_common::types::CgroupVersion;

static VERSION: OnceLock<CgroupVersion> = OnceLock::new();

/// Resolves the active cgroup hierarchy model, caching the first answer.
///
/// # Errors
///
/// Returns an `Inspect` error if the cgroup mount root cannot be
/// inspected.
pub fn resolve() -> Result<CgroupVersion> {
    if let Some(version) = VERSION.get() {
        return Ok(*version);
    }
    let detected = detect()?;
    Ok(*VERSION.get_or_init(|| detected))
}

/// Detects the hierarchy model from the filesystem type of the cgroup
/// mount root: `cgroup2fs` means the unified hierarchy, anything else
/// (typically `tmpfs` carrying per-controller mounts) means legacy.
#[cfg(target_os = "linux")]
fn detect() -> Result<CgroupVersion> {
    use cgverify_common::constants::CGROUP_MOUNT_ROOT;
    use cgverify_common::error::CgverifyError;
    use nix::sys::statfs::{CGROUP2_SUPER_MAGIC, statfs};

    let stat = statfs(CGROUP_MOUNT_ROOT).map_err(|e| CgverifyError::Inspect {
        message: format!("statfs {CGROUP_MOUNT_ROOT}: {e}"),
    })?;
    let version = if stat.filesystem_type() == CGROUP2_SUPER_MAGIC {
        CgroupVersion::Unified
    } else {
        CgroupVersion::Legacy
    };
    tracing::debug!(%version, "cgroup hierarchy resolved");
    Ok(version)
}

/// Stub for non-Linux platforms.
#[cfg(not(target_os = "linux"))]
fn detect() -> Result<CgroupVersion> {
    Err(cgverify_common::error::CgverifyError::Config {
        message: "cgroup inspection requires Linux".into(),
    })
}
