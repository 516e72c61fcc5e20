//! Domain primitive types used across the cgverify workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution privilege profile the runtime under test is driven with.
///
/// Profiles are supplied by the surrounding test environment and are
/// immutable for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Full root: real uid 0, no user namespace.
    Root,
    /// Plain unprivileged user.
    User,
    /// Unprivileged user inside a user namespace.
    UserNamespace,
    /// Unprivileged user with a fake-root uid mapping.
    Fakeroot,
}

impl Profile {
    /// Whether this profile carries real root privilege.
    ///
    /// Fakeroot maps uid 0 inside a user namespace but holds no host
    /// privilege, so only `Root` counts as privileged.
    #[must_use]
    pub const fn privileged(self) -> bool {
        matches!(self, Self::Root)
    }

    /// All profiles, in the order suites iterate them.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Root, Self::User, Self::UserNamespace, Self::Fakeroot]
    }

    /// The unprivileged profiles.
    #[must_use]
    pub const fn rootless() -> [Self; 3] {
        [Self::User, Self::UserNamespace, Self::Fakeroot]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::User => write!(f, "user"),
            Self::UserNamespace => write!(f, "usernamespace"),
            Self::Fakeroot => write!(f, "fakeroot"),
        }
    }
}

/// Kernel cgroup hierarchy model active on the host.
///
/// Resolved once per process and treated as immutable for the run; no
/// scenario may assume the host can switch models mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CgroupVersion {
    /// Legacy multi-hierarchy model: one mount per controller.
    Legacy,
    /// Unified hierarchy: a single mount carrying all controllers.
    Unified,
}

impl fmt::Display for CgroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy (v1)"),
            Self::Unified => write!(f, "unified (v2)"),
        }
    }
}

/// Unique name for an ephemeral container instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceName(String);

impl InstanceName {
    /// Creates an instance name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Generates a random instance name from a v4 UUID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a started instance, valid between a successful start and stop.
///
/// The join reference is the URI-style name the runtime's `exec` command
/// accepts for running instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceHandle {
    name: InstanceName,
    join_reference: String,
}

impl InstanceHandle {
    /// Binds a handle to a freshly generated instance name.
    #[must_use]
    pub fn new(name: InstanceName) -> Self {
        let join_reference = format!("instance://{name}");
        Self {
            name,
            join_reference,
        }
    }

    /// The bare instance name, as passed to `instance start` and
    /// `instance stop`.
    #[must_use]
    pub fn name(&self) -> &InstanceName {
        &self.name
    }

    /// The `instance://<name>` reference accepted by `exec`.
    #[must_use]
    pub fn join_reference(&self) -> &str {
        &self.join_reference
    }
}
