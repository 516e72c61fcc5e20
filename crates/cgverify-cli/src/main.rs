//! # cgverify — cgroup verification CLI
//!
//! Drives a container runtime's CLI surface and verifies that requested
//! resource limits land in actual kernel control-group state, across
//! both cgroup hierarchy models and all privilege profiles.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
