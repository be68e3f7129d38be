//! Solver benchmark harness.
//!
//! Every instance file of a test folder is piped into a solver command and
//! the solver's output is replayed against the instance. Cases run
//! concurrently on a bounded pool; a case that hangs is killed at its
//! deadline and does not hold up the rest.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use qroute_compile::ReplayVerifier;
use qroute_text::parse_instance;

use crate::error::{BenchError, BenchResult};

/// Harness limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Per-case deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of solver processes at once.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            jobs: default_jobs(),
        }
    }
}

impl BenchConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> BenchResult<()> {
        if self.timeout_secs == 0 {
            return Err(BenchError::InvalidConfig(
                "timeout_secs must be at least 1".into(),
            ));
        }
        if self.jobs == 0 {
            return Err(BenchError::InvalidConfig("jobs must be at least 1".into()));
        }
        Ok(())
    }

    /// The per-case deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How a test case ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// The output replayed without violations.
    Passed,
    /// The output broke at least one routing rule.
    Rejected,
    /// The solver missed its deadline and was killed.
    TimedOut,
    /// The solver could not run or exited unsuccessfully, or the instance
    /// was unreadable.
    Crashed,
}

impl CaseStatus {
    /// Short uppercase label.
    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::Passed => "OK",
            CaseStatus::Rejected => "REJECTED",
            CaseStatus::TimedOut => "TIMEOUT",
            CaseStatus::Crashed => "CRASHED",
        }
    }
}

/// Result of one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// File name of the instance.
    pub name: String,
    /// Full path of the instance.
    pub path: PathBuf,
    /// How the case ended.
    pub status: CaseStatus,
    /// `CNOT`s in the solver output.
    pub cnot_count: usize,
    /// `SWAP`s in the solver output.
    pub swap_count: usize,
    /// Wall-clock time including process startup.
    pub elapsed: Duration,
    /// Violations, solver stderr, or the reason the case could not run.
    pub details: Vec<String>,
}

impl CaseReport {
    fn new(path: &Path) -> Self {
        Self {
            name: path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            path: path.to_path_buf(),
            status: CaseStatus::Crashed,
            cnot_count: 0,
            swap_count: 0,
            elapsed: Duration::ZERO,
            details: Vec::new(),
        }
    }

    fn fail(mut self, status: CaseStatus, detail: impl Into<String>) -> Self {
        self.status = status;
        self.details.push(detail.into());
        self
    }

    /// Check if the case passed.
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}

/// Aggregated results of one test folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderReport {
    /// Folder name.
    pub folder: String,
    /// Case results, sorted by name.
    pub cases: Vec<CaseReport>,
    /// Total `CNOT`s over passed cases.
    pub total_cnot: usize,
    /// Total `SWAP`s over passed cases.
    pub total_swap: usize,
}

impl FolderReport {
    /// Aggregate case results.
    pub fn new(folder: impl Into<String>, mut cases: Vec<CaseReport>) -> Self {
        cases.sort_by(|a, b| a.name.cmp(&b.name));
        let passed = cases.iter().filter(|c| c.passed());
        let (total_cnot, total_swap) = passed.fold((0, 0), |(cnot, swap), c| {
            (cnot + c.cnot_count, swap + c.swap_count)
        });
        Self {
            folder: folder.into(),
            cases,
            total_cnot,
            total_swap,
        }
    }

    /// Number of passed cases.
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    /// Number of cases that did not pass.
    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    /// Mean `CNOT` count over passed cases.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_cnot(&self) -> f64 {
        match self.passed() {
            0 => 0.0,
            n => self.total_cnot as f64 / n as f64,
        }
    }

    /// Mean `SWAP` count over passed cases.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_swap(&self) -> f64 {
        match self.passed() {
            0 => 0.0,
            n => self.total_swap as f64 / n as f64,
        }
    }
}

/// Results of a whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchReport {
    /// Per-folder results, in the order requested.
    pub folders: Vec<FolderReport>,
}

impl BenchReport {
    /// Check if every case of every folder passed.
    pub fn is_success(&self) -> bool {
        self.folders.iter().all(|f| f.failed() == 0)
    }
}

/// Callback invoked as each case finishes.
pub type CaseObserver = Arc<dyn Fn(&CaseReport) + Send + Sync>;

/// Runs a solver command over test folders.
pub struct Harness {
    solver: String,
    config: BenchConfig,
    observer: Option<CaseObserver>,
}

impl Harness {
    /// Create a harness for a solver command line.
    ///
    /// The command runs through the platform shell, so it may carry its own
    /// arguments.
    pub fn new(solver: impl Into<String>, config: BenchConfig) -> BenchResult<Self> {
        config.validate()?;
        Ok(Self {
            solver: solver.into(),
            config,
            observer: None,
        })
    }

    /// Register a callback for finished cases.
    #[must_use]
    pub fn with_observer(mut self, observer: CaseObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The harness limits.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run every requested folder under `testset`.
    pub async fn run(&self, testset: &Path, folders: &[String]) -> BenchResult<BenchReport> {
        let mut report = BenchReport::default();
        for folder in folders {
            report.folders.push(self.run_folder(&testset.join(folder)).await?);
        }
        Ok(report)
    }

    /// Run every file of one folder.
    pub async fn run_folder(&self, dir: &Path) -> BenchResult<FolderReport> {
        let cases = list_cases(dir).await?;
        if cases.is_empty() {
            return Err(BenchError::NoTestCases(dir.to_path_buf()));
        }
        info!(folder = %dir.display(), cases = cases.len(), jobs = self.config.jobs, "running folder");

        let reports: Vec<CaseReport> = stream::iter(cases)
            .map(|path| async move {
                let report = self.run_case(&path).await;
                if let Some(observer) = &self.observer {
                    observer(&report);
                }
                report
            })
            .buffer_unordered(self.config.jobs)
            .collect()
            .await;

        let name = dir
            .file_name()
            .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().into_owned());
        let folder = FolderReport::new(name, reports);
        info!(
            folder = %folder.folder,
            passed = folder.passed(),
            failed = folder.failed(),
            avg_cnot = folder.avg_cnot(),
            avg_swap = folder.avg_swap(),
            "folder complete"
        );
        Ok(folder)
    }

    /// Run the solver on one instance file and replay its output.
    #[instrument(skip(self), fields(solver = %self.solver))]
    pub async fn run_case(&self, path: &Path) -> CaseReport {
        let started = Instant::now();
        let mut report = self.execute(path).await;
        report.elapsed = started.elapsed();
        match report.status {
            CaseStatus::Passed => debug!(
                cnots = report.cnot_count,
                swaps = report.swap_count,
                "case passed"
            ),
            status => warn!(status = status.label(), details = ?report.details, "case failed"),
        }
        report
    }

    async fn execute(&self, path: &Path) -> CaseReport {
        let report = CaseReport::new(path);

        let source = match tokio::fs::read_to_string(path).await {
            Ok(source) => source,
            Err(e) => return report.fail(CaseStatus::Crashed, format!("unreadable instance: {e}")),
        };
        let instance = match parse_instance(&source) {
            Ok(instance) => instance,
            Err(e) => return report.fail(CaseStatus::Crashed, format!("invalid instance: {e}")),
        };
        let verifier = match ReplayVerifier::new(&instance) {
            Ok(verifier) => verifier,
            Err(e) => return report.fail(CaseStatus::Crashed, format!("invalid instance: {e}")),
        };

        let mut child = match shell(&self.solver)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return report.fail(CaseStatus::Crashed, format!("failed to spawn solver: {e}")),
        };

        // Kills whatever the solver left behind once the case is decided.
        let _group = ProcessGroup::new(child.id());

        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                // A solver may exit without reading all of its input.
                let _ = stdin.write_all(source.as_bytes()).await;
            });
        }

        // The shell dies with the dropped child; its descendants die with
        // the process group.
        let output = match tokio::time::timeout(self.config.timeout(), child.wait_with_output()).await {
            Err(_) => {
                return report.fail(
                    CaseStatus::TimedOut,
                    format!("no output after {}s", self.config.timeout_secs),
                );
            }
            Ok(Err(e)) => return report.fail(CaseStatus::Crashed, format!("solver I/O error: {e}")),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return report.fail(
                CaseStatus::Crashed,
                format!("solver exited with {}: {}", output.status, stderr.trim()),
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let replay = verifier.verify_text(&stdout);
        let mut report = report;
        report.cnot_count = replay.cnot_count;
        report.swap_count = replay.swap_count;
        if replay.is_valid() {
            report.status = CaseStatus::Passed;
        } else {
            report.status = CaseStatus::Rejected;
            report.details = replay.violations.iter().map(ToString::to_string).collect();
        }
        report
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    // The shell leads a fresh group so its descendants can be killed with it.
    cmd.process_group(0);
    cmd
}

#[cfg(not(unix))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Process group of a spawned solver, killed on drop.
struct ProcessGroup {
    #[cfg_attr(not(unix), allow(dead_code))]
    leader: Option<u32>,
}

impl ProcessGroup {
    fn new(leader: Option<u32>) -> Self {
        Self { leader }
    }
}

#[cfg(unix)]
impl Drop for ProcessGroup {
    fn drop(&mut self) {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let Some(pgid) = self.leader.and_then(|id| i32::try_from(id).ok()) else {
            return;
        };
        // ESRCH means every member has already exited.
        if killpg(Pid::from_raw(pgid), Signal::SIGKILL).is_ok() {
            debug!(pgid, "killed solver process group");
        }
    }
}

/// Regular files of a folder, sorted by name.
async fn list_cases(dir: &Path) -> BenchResult<Vec<PathBuf>> {
    let io_err = |source: std::io::Error| BenchError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut cases = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        if entry.file_type().await.map_err(io_err)?.is_file() {
            cases.push(entry.path());
        }
    }
    cases.sort();
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, status: CaseStatus, cnot: usize, swap: usize) -> CaseReport {
        CaseReport {
            status,
            cnot_count: cnot,
            swap_count: swap,
            ..CaseReport::new(Path::new(name))
        }
    }

    #[test]
    fn test_folder_aggregation() {
        let folder = FolderReport::new(
            "tiny",
            vec![
                case("b.txt", CaseStatus::Passed, 10, 4),
                case("c.txt", CaseStatus::TimedOut, 0, 0),
                case("a.txt", CaseStatus::Passed, 6, 0),
            ],
        );
        let names: Vec<_> = folder.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(folder.total_cnot, 16);
        assert_eq!(folder.total_swap, 4);
        assert_eq!(folder.passed(), 2);
        assert_eq!(folder.failed(), 1);
        assert!((folder.avg_cnot() - 8.0).abs() < f64::EPSILON);
        assert!((folder.avg_swap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_folder_averages() {
        let folder = FolderReport::new("empty", vec![case("a", CaseStatus::Crashed, 0, 0)]);
        assert!(folder.avg_cnot().abs() < f64::EPSILON);
        let report = BenchReport {
            folders: vec![folder],
        };
        assert!(!report.is_success());
    }

    #[test]
    fn test_config_validation() {
        assert!(BenchConfig::default().validate().is_ok());
        assert!(BenchConfig::default().jobs >= 1);
        let config = BenchConfig {
            timeout_secs: 0,
            jobs: 1,
        };
        assert!(config.validate().is_err());
        let config = BenchConfig {
            timeout_secs: 1,
            jobs: 0,
        };
        assert!(config.validate().is_err());
    }
}
