//! `cgverify env` — Show the detected cgroup environment.

use clap::Args;

use cgverify_common::types::CgroupVersion;
use cgverify_core::probe::HostPaths;
use cgverify_core::{delegation, version};

/// Arguments for the `env` command.
#[derive(Args, Debug)]
pub struct EnvArgs {}

/// Executes the `env` command.
///
/// # Errors
///
/// Returns an error if the cgroup mount cannot be inspected.
pub fn execute(_args: EnvArgs) -> anyhow::Result<()> {
    let resolved = version::resolve().map_err(|e| anyhow::anyhow!("{e}"))?;
    tracing::info!(%resolved, "cgroup environment inspected");
    println!("cgroup hierarchy: {resolved}");

    if resolved == CgroupVersion::Unified {
        let controllers = delegation::delegated_controllers(&HostPaths::default())
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        if controllers.is_empty() {
            println!("delegated controllers: none");
        } else {
            println!("delegated controllers: {}", controllers.join(" "));
        }
    } else {
        println!("delegated controllers: n/a (legacy hierarchy)");
    }
    Ok(())
}
