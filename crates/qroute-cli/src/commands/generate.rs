//! Generate command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use qroute_bench::{Preset, generate};
use qroute_text::emit_instance;

use super::common::write_output;

/// Execute the generate command.
pub fn execute(preset: Preset, seed: u64, output: Option<&Path>) -> Result<()> {
    let instance = generate(preset, seed);
    write_output(output, &emit_instance(&instance))?;

    if let Some(path) = output {
        eprintln!(
            "{} Generated {} instance: {} qubits, {} gates, {} links",
            style("✓").green().bold(),
            style(preset).cyan(),
            instance.num_logical(),
            instance.num_gates(),
            instance.links().len()
        );
        eprintln!("  Output: {}", style(path.display()).green());
    }
    Ok(())
}
