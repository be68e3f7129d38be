//! Harness tests against shell-script solvers.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use qroute_bench::{BenchConfig, BenchError, CaseReport, CaseStatus, Harness};
use tempfile::TempDir;

const INSTANCE: &str = "4 2 0 4 3\n1 1 2\n2 3 4\n1 1 2\n2 2 3\n3 3 4\n";
const SOLUTION: &str = "1 1\n2 2\n3 3\n4 4\nCNOT q1 q2\nCNOT q3 q4\n";

fn config(timeout_secs: u64) -> BenchConfig {
    BenchConfig {
        timeout_secs,
        jobs: 4,
    }
}

/// A test set with one folder holding `count` copies of the instance.
fn testset(folder: &str, count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let cases = dir.path().join(folder);
    fs::create_dir(&cases).unwrap();
    for i in 0..count {
        fs::write(cases.join(format!("case{i}.txt")), INSTANCE).unwrap();
    }
    dir
}

/// Solver that ignores its input and prints a fixed file.
fn fixed_output(dir: &Path, output: &str) -> String {
    let path = dir.join("answer.out");
    fs::write(&path, output).unwrap();
    format!("cat > /dev/null; cat '{}'", path.display())
}

#[tokio::test]
async fn passing_solver() {
    let set = testset("tiny", 3);
    let solver = fixed_output(set.path(), SOLUTION);
    let harness = Harness::new(solver, config(10)).unwrap();

    let report = harness.run(set.path(), &["tiny".into()]).await.unwrap();
    assert!(report.is_success());

    let folder = &report.folders[0];
    assert_eq!(folder.folder, "tiny");
    assert_eq!(folder.passed(), 3);
    assert_eq!(folder.total_cnot, 6);
    assert_eq!(folder.total_swap, 0);
    let names: Vec<_> = folder.cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["case0.txt", "case1.txt", "case2.txt"]);
}

#[tokio::test]
async fn incomplete_output_is_rejected() {
    let set = testset("tiny", 1);
    let solver = fixed_output(set.path(), "1 1\n2 2\n3 3\n4 4\nCNOT q1 q2\n");
    let harness = Harness::new(solver, config(10)).unwrap();

    let folder = harness.run_folder(&set.path().join("tiny")).await.unwrap();
    let case = &folder.cases[0];
    assert_eq!(case.status, CaseStatus::Rejected);
    assert_eq!(case.cnot_count, 1);
    assert!(!case.details.is_empty());
    assert_eq!(folder.total_cnot, 0);
}

#[tokio::test]
async fn crashing_solver() {
    let set = testset("tiny", 1);
    let harness = Harness::new("echo boom >&2; exit 3", config(10)).unwrap();

    let folder = harness.run_folder(&set.path().join("tiny")).await.unwrap();
    let case = &folder.cases[0];
    assert_eq!(case.status, CaseStatus::Crashed);
    assert!(case.details[0].contains("boom"));
}

#[tokio::test]
async fn hanging_solver_times_out_alone() {
    let set = testset("tiny", 2);
    // Every case has the same content, so the first solver to create the
    // marker directory is the one that hangs.
    let marker = set.path().join("slow");
    let answer = fixed_output(set.path(), SOLUTION);
    let solver = format!(
        "if mkdir '{}' 2>/dev/null; then cat > /dev/null; exec sleep 30; fi; {answer}",
        marker.display(),
    );
    let harness = Harness::new(solver, config(1)).unwrap();

    let started = std::time::Instant::now();
    let folder = harness.run_folder(&set.path().join("tiny")).await.unwrap();
    assert!(started.elapsed().as_secs() < 10);

    let statuses: Vec<_> = folder.cases.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses.iter().filter(|&&s| s == CaseStatus::TimedOut).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|&&s| s == CaseStatus::Passed).count(),
        1
    );
}

#[tokio::test]
async fn timeout_kills_forked_descendants() {
    let set = testset("tiny", 1);
    let marker = set.path().join("survived");
    // The subshell is a separate process that outlives a killed `sh`.
    let solver = format!(
        "cat > /dev/null; (sleep 2; touch '{}'); sleep 30",
        marker.display()
    );
    let harness = Harness::new(solver, config(1)).unwrap();

    let folder = harness.run_folder(&set.path().join("tiny")).await.unwrap();
    assert_eq!(folder.cases[0].status, CaseStatus::TimedOut);

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert!(!marker.exists(), "solver descendant kept running after timeout");
}

#[tokio::test]
async fn observer_sees_every_case() {
    let set = testset("tiny", 5);
    let solver = fixed_output(set.path(), SOLUTION);
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let harness = Harness::new(solver, config(10))
        .unwrap()
        .with_observer(Arc::new(move |_: &CaseReport| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

    harness.run_folder(&set.path().join("tiny")).await.unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn unreadable_instance_is_a_crash() {
    let set = testset("tiny", 0);
    fs::write(set.path().join("tiny").join("bad.txt"), "not an instance").unwrap();
    let solver = fixed_output(set.path(), SOLUTION);
    let harness = Harness::new(solver, config(10)).unwrap();

    let folder = harness.run_folder(&set.path().join("tiny")).await.unwrap();
    assert_eq!(folder.cases[0].status, CaseStatus::Crashed);
    assert!(folder.cases[0].details[0].contains("invalid instance"));
}

#[tokio::test]
async fn empty_folder_is_an_error() {
    let set = testset("tiny", 0);
    let harness = Harness::new("cat", config(10)).unwrap();
    let err = harness.run_folder(&set.path().join("tiny")).await.unwrap_err();
    assert!(matches!(err, BenchError::NoTestCases(_)));
}

#[tokio::test]
async fn missing_folder_is_an_error() {
    let set = testset("tiny", 1);
    let harness = Harness::new("cat", config(10)).unwrap();
    let err = harness
        .run(set.path(), &["absent".into()])
        .await
        .unwrap_err();
    assert!(matches!(err, BenchError::Io { .. }));
}
