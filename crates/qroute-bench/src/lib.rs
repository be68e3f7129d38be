//! Benchmarking support for qubit routers.
//!
//! Two pieces live here:
//!
//! - [`generate`]: seeded random instances in the size classes used by the
//!   test folders (`tiny` through `large`).
//! - [`harness`]: runs any solver command over folders of instance files,
//!   replays each output against its instance, and aggregates per-folder
//!   gate counts.
//!
//! ```no_run
//! use std::path::Path;
//! use qroute_bench::{BenchConfig, Harness};
//!
//! # async fn demo() -> qroute_bench::BenchResult<()> {
//! let harness = Harness::new("./my-solver", BenchConfig::default())?;
//! let report = harness.run(Path::new("testset"), &["tiny".to_string()]).await?;
//! for folder in &report.folders {
//!     println!("{} avg {:.1} SWAP", folder.folder, folder.avg_swap());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generate;
pub mod harness;

pub use error::{BenchError, BenchResult};
pub use generate::{Preset, generate, random_instance};
pub use harness::{
    BenchConfig, BenchReport, CaseObserver, CaseReport, CaseStatus, FolderReport, Harness,
};
