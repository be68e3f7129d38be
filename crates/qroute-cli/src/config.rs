//! CLI configuration.
//!
//! Values are resolved in three layers: an optional YAML file, then
//! `QROUTE_*` environment variables, then command-line flags. Each layer
//! only touches the fields it sets.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use qroute_bench::BenchConfig;
use qroute_compile::RoutingConfig;

/// Everything the CLI can configure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Routing heuristic parameters.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Benchmark harness limits.
    #[serde(default)]
    pub bench: BenchConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load the file (or defaults) and apply environment overrides.
    ///
    /// Command-line flags are applied by the caller afterwards, followed by
    /// [`Config::validate`].
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_env(|name| std::env::var(name).ok())
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set override the current values; a set
    /// variable that does not parse is an error.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        override_from(&lookup, "QROUTE_LOOKAHEAD_WEIGHT", &mut self.routing.lookahead_weight)?;
        override_from(&lookup, "QROUTE_ATTEMPT_LIMIT", &mut self.routing.attempt_limit)?;
        override_from(&lookup, "QROUTE_TABU_WINDOW", &mut self.routing.tabu_window)?;
        override_from(&lookup, "QROUTE_WARM_START", &mut self.routing.warm_start)?;
        override_from(&lookup, "QROUTE_TIMEOUT", &mut self.bench.timeout_secs)?;
        override_from(&lookup, "QROUTE_JOBS", &mut self.bench.jobs)?;
        Ok(self)
    }

    /// Validate the resolved configuration.
    pub fn validate(&self) -> Result<()> {
        self.routing.validate()?;
        self.bench.validate()?;
        Ok(())
    }
}

fn override_from<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    field: &mut T,
) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        *field = raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value '{raw}' for {name}: {e}"))?;
    }
    Ok(())
}
