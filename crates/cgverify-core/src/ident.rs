//! Instance name generation.
//!
//! Every persistent-instance scenario binds a fresh name so that
//! sequential cases cannot interfere on the shared container-name
//! namespace. The generator is owned by the runner and passed explicitly
//! to the lifecycle drivers, which keeps ordering reproducible and lets
//! tests substitute a deterministic source.

use cgverify_common::error::Result;
use cgverify_common::types::InstanceName;

/// Source of unique instance names.
pub trait NameSource {
    /// Returns the next name. Names drawn from one source within a run
    /// must be pairwise distinct.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce a name, e.g. when
    /// system entropy is unavailable. Callers treat this as fatal for
    /// the current case.
    fn next_name(&mut self) -> Result<InstanceName>;
}

/// Name source backed by cryptographically-seeded v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNameSource;

impl NameSource for UuidNameSource {
    fn next_name(&mut self) -> Result<InstanceName> {
        Ok(InstanceName::generate())
    }
}
