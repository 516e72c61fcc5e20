//! # cgverify-core
//!
//! Kernel-facing primitives for the cgverify harness:
//! - **Hierarchy detection**: legacy (v1) vs unified (v2) cgroup model,
//!   resolved once per process.
//! - **Delegation**: unified-hierarchy controller delegation checks for
//!   unprivileged callers.
//! - **Probes**: in-container shell commands that read a process's own
//!   cgroup resource files, plus host-side availability checks.
//! - **Invocation**: blocking, captured invocations of the runtime CLI
//!   under test.
//! - **Identifiers**: collision-free instance name generation.

pub mod delegation;
pub mod ident;
pub mod invoke;
pub mod probe;
pub mod version;
