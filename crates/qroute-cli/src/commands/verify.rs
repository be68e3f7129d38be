//! Verify command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qroute_compile::ReplayVerifier;

use super::common::{load_instance, read_input};

/// Execute the verify command.
///
/// Fails when the solution breaks any rule, after printing every violation.
pub fn execute(instance_path: &Path, solution_path: &Path, json: bool) -> Result<()> {
    let instance = load_instance(Some(instance_path))?;
    let text = read_input(Some(solution_path))?;

    let verifier = ReplayVerifier::new(&instance).context("Invalid instance")?;
    let report = verifier.verify_text(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_valid() {
        println!(
            "{} {} all OK. {} CNOT, {} SWAP",
            style("✓").green().bold(),
            solution_path.display(),
            report.cnot_count,
            report.swap_count
        );
    } else {
        println!(
            "{} {} rejected with {} violation(s)",
            style("✗").red().bold(),
            solution_path.display(),
            report.violations.len()
        );
        for violation in &report.violations {
            println!("  {violation}");
        }
    }

    if !report.is_valid() {
        anyhow::bail!("Solution failed verification");
    }
    Ok(())
}
