//! Blocking invocation of the runtime CLI under test.
//!
//! Every call is a single-attempt, captured `std::process::Command`
//! execution. The harness performs no retries, asynchronous waiting, or
//! cancellation; a hung invocation is the surrounding framework's
//! problem, not handled here.

use std::path::PathBuf;
use std::process::ExitStatus;

use cgverify_common::error::{CgverifyError, Result};
use cgverify_common::types::InstanceName;

/// Captured result of one runtime invocation or in-container probe.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code, with fatal signals mapped to `128 + signo`.
    pub exit_code: i32,
}

impl RunOutput {
    /// Whether stdout contains the needle (case-sensitive).
    #[must_use]
    pub fn stdout_contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }

    /// Whether stderr contains the needle (case-sensitive).
    #[must_use]
    pub fn stderr_contains(&self, needle: &str) -> bool {
        self.stderr.contains(needle)
    }
}

/// Handle on the runtime binary under test.
#[derive(Debug, Clone)]
pub struct RuntimeCli {
    bin: PathBuf,
}

impl RuntimeCli {
    /// Creates a handle for the given runtime binary.
    #[must_use]
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Path of the runtime binary.
    #[must_use]
    pub fn bin(&self) -> &PathBuf {
        &self.bin
    }

    /// Runs the runtime with the given arguments, blocking until exit.
    ///
    /// # Errors
    ///
    /// Returns an `Invoke` error if the binary cannot be spawned at all.
    /// A non-zero exit from the runtime is not an error here; callers
    /// compare `exit_code` against their expectation.
    pub fn run(&self, args: &[String]) -> Result<RunOutput> {
        tracing::debug!(bin = %self.bin.display(), ?args, "invoking runtime");
        let output = std::process::Command::new(&self.bin)
            .args(args)
            .output()
            .map_err(|e| CgverifyError::Invoke {
                binary: self.bin.clone(),
                source: e,
            })?;

        let result = RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: exit_code(&output.status),
        };
        tracing::debug!(exit_code = result.exit_code, "runtime exited");
        Ok(result)
    }

    /// Runs `exec <args...>`.
    ///
    /// # Errors
    ///
    /// Returns an `Invoke` error if the binary cannot be spawned.
    pub fn exec(&self, args: &[String]) -> Result<RunOutput> {
        let mut full = vec!["exec".to_string()];
        full.extend_from_slice(args);
        self.run(&full)
    }

    /// Runs `instance start <args...> <name>`.
    ///
    /// # Errors
    ///
    /// Returns an `Invoke` error if the binary cannot be spawned.
    pub fn instance_start(&self, args: &[String], name: &InstanceName) -> Result<RunOutput> {
        let mut full = vec!["instance".to_string(), "start".to_string()];
        full.extend_from_slice(args);
        full.push(name.to_string());
        self.run(&full)
    }

    /// Runs `instance stop <name>`.
    ///
    /// # Errors
    ///
    /// Returns an `Invoke` error if the binary cannot be spawned.
    pub fn instance_stop(&self, name: &InstanceName) -> Result<RunOutput> {
        self.run(&[
            "instance".to_string(),
            "stop".to_string(),
            name.to_string(),
        ])
    }
}

/// Maps an exit status to the conventional shell code: the plain exit
/// code when the process exited, `128 + signo` when a signal killed it
/// (e.g. 137 for the OOM killer's SIGKILL).
#[cfg(unix)]
fn exit_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
