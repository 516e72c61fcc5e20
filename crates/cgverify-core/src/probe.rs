//! Resource observation probes.
//!
//! A probe is a shell command executed *inside* the target container. It
//! parses the process's own `/proc/self/cgroup` descriptor to find its
//! cgroup path, then reads the requested resource pseudo-file under the
//! bind-mounted cgroup filesystem and emits its contents for substring
//! matching. A missing resource file makes the probe exit non-zero, which
//! surfaces as an observation failure rather than being swallowed.
//!
//! `/proc/self/cgroup` is colon-delimited, one record per active
//! hierarchy: `hierarchy-id:controller-list:cgroup-path`. Legacy records
//! carry a comma-separated controller list; the unified record has
//! hierarchy id 0 and an empty controller list.

use std::path::PathBuf;

use cgverify_common::constants::{CGROUP_MOUNT_ROOT, PROC_SELF_CGROUP};

/// Host-side locations of the kernel cgroup interface.
///
/// The probe builders always address the container's own view of
/// `/proc` and the cgroup mount; these paths only affect the host-side
/// availability and delegation checks, and harness self-tests point
/// them at fixture directories.
#[derive(Debug, Clone)]
pub struct HostPaths {
    /// Cgroup filesystem mount root.
    pub cgroup_root: PathBuf,
    /// Self-referential cgroup membership descriptor.
    pub proc_cgroup: PathBuf,
}

impl Default for HostPaths {
    fn default() -> Self {
        Self {
            cgroup_root: CGROUP_MOUNT_ROOT.into(),
            proc_cgroup: PROC_SELF_CGROUP.into(),
        }
    }
}

/// Builds the in-container probe for a legacy (v1) resource.
///
/// Legacy mounts are segmented per controller, so the controller name
/// appears both in the mount path and in the record selector.
#[must_use]
pub fn legacy_probe(controller: &str, resource: &str) -> String {
    format!(
        "cat {CGROUP_MOUNT_ROOT}/{controller}$(cat {PROC_SELF_CGROUP} | grep '[,:]{controller}[,:]' | cut -d ':' -f 3)/{resource}"
    )
}

/// Builds the in-container probe for a unified (v2) resource.
///
/// The unified hierarchy has a single shared mount root; the record with
/// hierarchy id 0 and no controller list carries the path.
#[must_use]
pub fn unified_probe(resource: &str) -> String {
    format!(
        "cat {CGROUP_MOUNT_ROOT}$(cat {PROC_SELF_CGROUP} | grep '^0::' | cut -d ':' -f 3)/{resource}"
    )
}

/// Extracts the cgroup path for a hierarchy from `/proc/self/cgroup`
/// content.
///
/// With `Some(controller)`, returns the path of the legacy hierarchy
/// whose controller list contains that controller. With `None`, returns
/// the unified record's path (hierarchy id 0, empty controller list).
#[must_use]
pub fn self_cgroup_path(content: &str, controller: Option<&str>) -> Option<String> {
    for line in content.lines() {
        let mut fields = line.splitn(3, ':');
        let (Some(id), Some(controllers), Some(path)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        let matched = match controller {
            Some(name) => controllers.split(',').any(|c| c == name),
            None => id == "0" && controllers.is_empty(),
        };
        if matched {
            return Some(path.to_string());
        }
    }
    None
}

/// Host-side path of a legacy resource file in the calling process's own
/// cgroup, if the hierarchy record for the controller exists.
fn own_legacy_resource(host: &HostPaths, controller: &str, resource: &str) -> Option<PathBuf> {
    let content = std::fs::read_to_string(&host.proc_cgroup).ok()?;
    let cgroup_path = self_cgroup_path(&content, Some(controller))?;
    let relative = cgroup_path.trim_start_matches('/');
    Some(
        host.cgroup_root
            .join(controller)
            .join(relative)
            .join(resource),
    )
}

/// Whether a legacy controller resource exists in the caller's own
/// cgroup. Some hosts lack optional resources entirely, e.g.
/// `memory.memsw.limit_in_bytes` or `blkio.bfq.weight`; such scenarios
/// are skipped, not failed.
#[must_use]
pub fn resource_exists(host: &HostPaths, controller: &str, resource: &str) -> bool {
    let Some(path) = own_legacy_resource(host, controller, resource) else {
        return false;
    };
    let exists = path.exists();
    if !exists {
        tracing::debug!(path = %path.display(), "legacy resource absent on this host");
    }
    exists
}
