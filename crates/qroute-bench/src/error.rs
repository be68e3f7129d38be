//! Error handling for the benchmark harness.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for harness operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// Errors that abort a benchmark run.
///
/// Failures of individual test cases are not errors; they are recorded in
/// the case report.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Filesystem access failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A test folder contains no test cases.
    #[error("No test cases in {0}")]
    NoTestCases(PathBuf),

    /// Harness configuration rejected by validation.
    #[error("Invalid benchmark configuration: {0}")]
    InvalidConfig(String),

    /// Unknown instance preset name.
    #[error("Unknown preset '{0}' (expected tiny, xsmall, small, medium or large)")]
    UnknownPreset(String),
}
