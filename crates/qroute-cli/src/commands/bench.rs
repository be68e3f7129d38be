//! Bench command implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qroute_bench::{BenchConfig, CaseReport, CaseStatus, Harness};

/// Execute the bench command.
///
/// Fails when any case did not pass, after printing every result.
pub async fn execute(
    solver: &str,
    testset: &Path,
    folders: &[String],
    config: BenchConfig,
    json: Option<&Path>,
) -> Result<()> {
    println!(
        "{} Benchmarking {} on {} (timeout {}s, {} jobs)",
        style("→").cyan().bold(),
        style(solver).green(),
        style(folders.join(", ")).yellow(),
        config.timeout_secs,
        config.jobs
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {pos} cases done")?);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let bar = spinner.clone();
    let harness = Harness::new(solver, config)?.with_observer(Arc::new(move |case: &CaseReport| {
        bar.inc(1);
        bar.suspend(|| println!("{}", case_line(case)));
    }));

    let report = harness
        .run(testset, folders)
        .await
        .context("Benchmark aborted")?;
    spinner.finish_and_clear();

    println!();
    for folder in &report.folders {
        let mark = if folder.failed() == 0 {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        };
        println!(
            "{} {} completed, avg {:.2} CNOT, {:.2} SWAP ({}/{} passed)",
            mark,
            style(&folder.folder).cyan(),
            folder.avg_cnot(),
            folder.avg_swap(),
            folder.passed(),
            folder.cases.len()
        );
    }

    if let Some(path) = json {
        let contents = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        println!("  Report: {}", style(path.display()).green());
    }

    if !report.is_success() {
        let failed: usize = report.folders.iter().map(|f| f.failed()).sum();
        anyhow::bail!("{failed} case(s) failed");
    }
    Ok(())
}

fn case_line(case: &CaseReport) -> String {
    let path = case.path.display();
    match case.status {
        CaseStatus::Passed => format!(
            "{path} all OK. {} CNOT, {} SWAP ({:.2}s)",
            case.cnot_count,
            case.swap_count,
            case.elapsed.as_secs_f64()
        ),
        status => {
            let mut line = format!("{path} {}", style(status.label()).red().bold());
            for detail in &case.details {
                line.push_str("\n    ");
                line.push_str(detail);
            }
            line
        }
    }
}
