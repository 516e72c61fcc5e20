//! # cgverify-harness
//!
//! The verification matrix for a container runtime's cgroup handling:
//! - **Matrix**: static scenario tables for persistent instances, one-shot
//!   actions, and per-resource flag verification, with expected exit
//!   codes, diagnostics, and kernel pseudo-file contents for both cgroup
//!   hierarchy models.
//! - **Gate**: applicability predicates deciding which scenarios run
//!   under which privilege profile, including unified-hierarchy
//!   delegation for unprivileged callers.
//! - **Drivers**: lifecycle orchestration flows that invoke the runtime
//!   CLI and compare observed behavior against the matrix.
//! - **Runner**: strictly sequential suite execution with first-class
//!   pass/fail/skip reporting.

pub mod driver;
pub mod gate;
pub mod matrix;
pub mod report;
pub mod runner;
