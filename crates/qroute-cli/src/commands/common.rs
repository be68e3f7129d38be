//! Shared helpers for CLI commands.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use qroute_ir::Instance;
use qroute_text::parse_instance;

/// Read a file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}

/// Write to a file, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write file: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write stdout")
        }
    }
}

/// Load and parse an instance.
pub fn load_instance(path: Option<&Path>) -> Result<Instance> {
    let source = read_input(path)?;
    let label = path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    parse_instance(&source).with_context(|| format!("Invalid instance: {label}"))
}
