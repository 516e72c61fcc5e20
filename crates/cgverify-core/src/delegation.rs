//! Unified-hierarchy controller delegation checks.
//!
//! Under cgroups v2 an unprivileged caller can only exercise controllers
//! that the system manager has delegated to its subtree. A controller
//! missing from the caller's `cgroup.controllers` is a platform
//! limitation, not a runtime defect, so the affected scenario is skipped.

use cgverify_common::error::{CgverifyError, Result};

use crate::probe::{self, HostPaths};

/// Reads the caller's own `cgroup.controllers` content, if the unified
/// record and file exist.
fn own_controllers(host: &HostPaths) -> Result<Option<String>> {
    let content =
        std::fs::read_to_string(&host.proc_cgroup).map_err(|e| CgverifyError::Io {
            path: host.proc_cgroup.clone(),
            source: e,
        })?;
    let Some(cgroup_path) = probe::self_cgroup_path(&content, None) else {
        return Ok(None);
    };
    let controllers_file = host
        .cgroup_root
        .join(cgroup_path.trim_start_matches('/'))
        .join("cgroup.controllers");
    let Ok(controllers) = std::fs::read_to_string(&controllers_file) else {
        tracing::debug!(path = %controllers_file.display(), "no cgroup.controllers file");
        return Ok(None);
    };
    Ok(Some(controllers))
}

/// Whether the given controller is delegated to the calling process's
/// unified cgroup subtree.
///
/// A missing unified record or controllers file means nothing is
/// delegated and yields `false`, not an error.
///
/// # Errors
///
/// Returns an `Io` error only if the self-referential cgroup descriptor
/// itself cannot be read.
pub fn is_delegated(host: &HostPaths, controller: &str) -> Result<bool> {
    let Some(controllers) = own_controllers(host)? else {
        return Ok(false);
    };
    let delegated = controllers.split_whitespace().any(|c| c == controller);
    tracing::debug!(controller, delegated, "delegation check");
    Ok(delegated)
}

/// Lists the controllers delegated to the calling process's unified
/// cgroup, for diagnostic output.
///
/// # Errors
///
/// Returns an `Io` error if the self-referential cgroup descriptor
/// cannot be read.
pub fn delegated_controllers(host: &HostPaths) -> Result<Vec<String>> {
    let Some(controllers) = own_controllers(host)? else {
        return Ok(Vec::new());
    };
    Ok(controllers
        .split_whitespace()
        .map(ToString::to_string)
        .collect())
}
