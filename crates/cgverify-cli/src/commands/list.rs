//! `cgverify list` — Show the scenario matrix without executing it.

use clap::Args;

use cgverify_common::config::HarnessConfig;
use cgverify_harness::matrix;

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {}

/// Executes the `list` command.
///
/// # Errors
///
/// Infallible; returns `Ok` for dispatch symmetry.
pub fn execute(_args: ListArgs) -> anyhow::Result<()> {
    // Placeholder paths: the tables are shown, not run.
    let config = HarnessConfig::new("<runtime>", "<image>");

    println!(
        "{:<10} {:<22} {:<8} {:<8} NOTES",
        "SUITE", "CASE", "ROOTFUL", "ROOTLESS"
    );
    for case in matrix::instance_cases(&config) {
        println!(
            "{:<10} {:<22} {:<8} {:<8} start exit {}",
            "instance", case.name, case.rootful, case.rootless, case.start_exit
        );
    }
    let rootless = matrix::rootless_instance_case(&config);
    println!(
        "{:<10} {:<22} {:<8} {:<8} start exit {}",
        "instance", rootless.name, rootless.rootful, rootless.rootless, rootless.start_exit
    );
    for case in matrix::action_cases(&config) {
        println!(
            "{:<10} {:<22} {:<8} {:<8} exit {}",
            "action", case.name, case.rootful, case.rootless, case.exit
        );
    }
    for case in matrix::flag_cases() {
        let v2 = if case.skip_v2 {
            "no v2 equivalent".to_string()
        } else {
            format!("v2 {}", case.resource_v2)
        };
        println!(
            "{:<10} {:<22} {:<8} {:<8} v1 {}/{}, {}",
            "flags", case.name, true, true, case.controller_v1, case.resource_v1, v2
        );
    }
    Ok(())
}
