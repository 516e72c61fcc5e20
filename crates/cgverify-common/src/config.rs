//! Harness configuration model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CgverifyError, Result};

/// Configuration for one harness run.
///
/// The fixture files themselves are owned by the runtime under test; the
/// harness only references them by path and never parses their contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Path to the runtime binary under test.
    pub runtime_bin: PathBuf,
    /// Path to the container image every scenario runs against.
    pub image: PathBuf,
    /// Directory holding the named cgroup limit fixtures.
    pub fixture_dir: PathBuf,
    /// Whether to bind-mount the host cgroup filesystem into probe
    /// containers. Required for resource observation; disabled only in
    /// harness self-tests.
    pub bind_cgroup_fs: bool,
}

impl HarnessConfig {
    /// Creates a configuration for the given runtime binary and image,
    /// with the default fixture directory.
    #[must_use]
    pub fn new(runtime_bin: impl Into<PathBuf>, image: impl Into<PathBuf>) -> Self {
        Self {
            runtime_bin: runtime_bin.into(),
            image: image.into(),
            fixture_dir: PathBuf::from(crate::constants::DEFAULT_FIXTURE_DIR),
            bind_cgroup_fs: true,
        }
    }

    /// Returns the full path of a named fixture.
    #[must_use]
    pub fn fixture(&self, name: &str) -> PathBuf {
        self.fixture_dir.join(name)
    }

    /// Validates that the runtime binary exists and is a file.
    ///
    /// The image and fixtures are deliberately not checked: missing or
    /// broken fixtures are themselves scenario subjects.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the runtime binary is absent.
    pub fn validate(&self) -> Result<()> {
        if !self.runtime_bin.is_file() {
            return Err(CgverifyError::Config {
                message: format!("runtime binary not found: {}", self.runtime_bin.display()),
            });
        }
        Ok(())
    }
}
