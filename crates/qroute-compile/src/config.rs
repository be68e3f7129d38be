//! Routing configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CompileError, CompileResult};

/// How the final pass's initial mapping is derived from the trial pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarmStart {
    /// Route once from the identity mapping.
    Off,
    /// Undo the trial's swaps in reverse from its final mapping.
    #[default]
    UndoSwaps,
    /// Start the final pass where the trial pass ended.
    TrialFinal,
    /// Route the reversed circuit from the trial's final mapping and start
    /// the final pass where that ended.
    ReverseTraversal,
}

impl WarmStart {
    /// All variants, in CLI order.
    pub const ALL: [WarmStart; 4] = [
        WarmStart::Off,
        WarmStart::UndoSwaps,
        WarmStart::TrialFinal,
        WarmStart::ReverseTraversal,
    ];

    /// The kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            WarmStart::Off => "off",
            WarmStart::UndoSwaps => "undo-swaps",
            WarmStart::TrialFinal => "trial-final",
            WarmStart::ReverseTraversal => "reverse-traversal",
        }
    }
}

impl fmt::Display for WarmStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarmStart {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| {
                CompileError::InvalidConfig(format!(
                    "unknown warm start '{s}' (expected off, undo-swaps, trial-final or reverse-traversal)"
                ))
            })
    }
}

/// Parameters of the SWAP-insertion heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Weight of the lookahead set relative to blocked gates.
    #[serde(default = "default_lookahead_weight")]
    pub lookahead_weight: f64,

    /// Consecutive non-progressing swaps before the release valve fires.
    #[serde(default = "default_attempt_limit")]
    pub attempt_limit: u32,

    /// Number of recent swaps excluded from candidates (0 disables).
    #[serde(default)]
    pub tabu_window: u32,

    /// Initial mapping derivation for the final pass.
    #[serde(default)]
    pub warm_start: WarmStart,
}

fn default_lookahead_weight() -> f64 {
    0.5
}

fn default_attempt_limit() -> u32 {
    64
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            lookahead_weight: default_lookahead_weight(),
            attempt_limit: default_attempt_limit(),
            tabu_window: 0,
            warm_start: WarmStart::default(),
        }
    }
}

impl RoutingConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> CompileResult<()> {
        if !self.lookahead_weight.is_finite() || self.lookahead_weight < 0.0 {
            return Err(CompileError::InvalidConfig(format!(
                "lookahead_weight must be a non-negative number, got {}",
                self.lookahead_weight
            )));
        }
        if self.attempt_limit == 0 {
            return Err(CompileError::InvalidConfig(
                "attempt_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoutingConfig::default();
        assert!((config.lookahead_weight - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.attempt_limit, 64);
        assert_eq!(config.tabu_window, 0);
        assert_eq!(config.warm_start, WarmStart::UndoSwaps);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: RoutingConfig =
            serde_json::from_str(r#"{"tabu_window": 2, "warm_start": "trial-final"}"#).unwrap();
        assert_eq!(config.tabu_window, 2);
        assert_eq!(config.attempt_limit, 64);
        assert_eq!(config.warm_start, WarmStart::TrialFinal);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = RoutingConfig {
            lookahead_weight: -1.0,
            ..RoutingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RoutingConfig {
            attempt_limit: 0,
            ..RoutingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warm_start_from_str() {
        assert_eq!("off".parse::<WarmStart>().unwrap(), WarmStart::Off);
        assert_eq!(
            "reverse-traversal".parse::<WarmStart>().unwrap(),
            WarmStart::ReverseTraversal
        );
        assert_eq!(
            "undo-swaps".parse::<WarmStart>().unwrap(),
            WarmStart::UndoSwaps
        );
        assert!("sideways".parse::<WarmStart>().is_err());
    }
}
