//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - qubit routing with SWAP insertion",
        style("qroute").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qroute-ir       Instances, gates and solutions");
    println!("  qroute-text     Text formats for instances and solutions");
    println!("  qroute-compile  Routing heuristic and replay verifier");
    println!("  qroute-bench    Instance generator and solver harness");
    println!("  qroute-cli      Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
