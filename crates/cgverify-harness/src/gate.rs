//! Applicability gate: decides whether a scenario runs, and if not, why.
//!
//! Each axis (privilege profile, hierarchy-version skip, controller
//! delegation) is its own predicate; a case runs only when every axis
//! agrees. Skips are explicit outcomes, never silent and never failures.

use cgverify_common::error::Result;
use cgverify_common::types::{CgroupVersion, Profile};
use cgverify_core::delegation;
use cgverify_core::probe::HostPaths;

/// Why a scenario was not executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The case has no variant for this profile's privilege level.
    ProfileMismatch(Profile),
    /// The resource has no unified-hierarchy equivalent.
    NoUnifiedEquivalent,
    /// The unified controller is not delegated to the unprivileged caller.
    NotDelegated(String),
    /// The legacy resource file does not exist on this host.
    ResourceUnavailable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProfileMismatch(profile) => {
                write!(f, "not applicable under the {profile} profile")
            }
            Self::NoUnifiedEquivalent => {
                write!(f, "no unified-hierarchy equivalent for this resource")
            }
            Self::NotDelegated(controller) => {
                write!(f, "controller '{controller}' not delegated to this user")
            }
            Self::ResourceUnavailable(resource) => {
                write!(f, "resource '{resource}' not present on this host")
            }
        }
    }
}

/// Profile axis: a privileged profile needs a rootful variant, an
/// unprivileged one needs a rootless variant.
#[must_use]
pub fn profile_applies(rootful: bool, rootless: bool, profile: Profile) -> bool {
    if profile.privileged() { rootful } else { rootless }
}

/// Version axis: a case with no unified equivalent never runs under
/// unified resolution, regardless of profile.
#[must_use]
pub fn version_applies(skip_v2: bool, version: CgroupVersion) -> bool {
    !(skip_v2 && version == CgroupVersion::Unified)
}

/// Delegation axis: unified-hierarchy checks under an unprivileged
/// profile additionally require the controller to be delegated.
/// Privileged callers and legacy resolution always pass this axis.
///
/// # Errors
///
/// Returns an error if the caller's own cgroup membership cannot be read.
pub fn delegation_applies(
    host: &HostPaths,
    controller: &str,
    profile: Profile,
    version: CgroupVersion,
) -> Result<bool> {
    if profile.privileged() || version == CgroupVersion::Legacy {
        return Ok(true);
    }
    delegation::is_delegated(host, controller)
}
