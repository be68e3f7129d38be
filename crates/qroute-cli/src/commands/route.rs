//! Route command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qroute_compile::{Router, RoutingConfig};
use qroute_text::emit_solution;

use super::common::{load_instance, write_output};

/// Execute the route command.
///
/// Status lines go to stderr; stdout carries nothing but the solution.
pub fn execute(input: Option<&Path>, output: Option<&Path>, config: RoutingConfig) -> Result<()> {
    let instance = load_instance(input)?;
    let router = Router::new(config)?;

    let outcome = router.route(&instance).context("Routing failed")?;
    let solution = outcome.into_solution();
    write_output(output, &emit_solution(&solution))?;

    if let Some(path) = output {
        eprintln!(
            "{} Routed {} gates on {} qubits: {} CNOT, {} SWAP",
            style("✓").green().bold(),
            instance.num_gates(),
            instance.num_physical(),
            solution.cnot_count(),
            style(solution.swap_count()).yellow()
        );
        eprintln!("  Output: {}", style(path.display()).green());
    }

    Ok(())
}
