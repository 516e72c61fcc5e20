//! Unified error types for the cgverify workspace.
//!
//! These variants cover harness-internal faults only. Divergence between
//! the runtime under test and a scenario expectation is not an error; it
//! is recorded as a failed case outcome by the harness crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum CgverifyError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The runtime under test could not be invoked at all.
    #[error("failed to invoke runtime {binary}: {source}")]
    Invoke {
        /// Runtime binary that could not be spawned.
        binary: PathBuf,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The kernel cgroup state could not be inspected.
    #[error("cgroup inspection failed: {message}")]
    Inspect {
        /// Description of the failed inspection.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CgverifyError>;
