//! qroute command-line interface.
//!
//! ```text
//! qroute route    < instance.txt > solution.txt
//! qroute verify   --instance instance.txt --solution solution.txt
//! qroute bench    --solver "qroute route" --testset-path testset --folders tiny xsmall
//! qroute generate --preset small --seed 7 -o small_7.txt
//! ```
//!
//! Logs go to stderr so that `qroute route` can itself be benchmarked as a
//! solver.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{bench, generate, route, verify, version};
use config::Config;
use qroute_bench::Preset;
use qroute_compile::WarmStart;

/// qroute - qubit routing with SWAP insertion
#[derive(Parser)]
#[command(name = "qroute")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, global = true, env = "QROUTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route an instance and print the solution
    Route {
        /// Instance file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Solution file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Initial mapping derivation (off, undo-swaps, trial-final, reverse-traversal)
        #[arg(long)]
        warm_start: Option<WarmStart>,

        /// Weight of the lookahead set
        #[arg(long)]
        lookahead_weight: Option<f64>,

        /// Non-progressing swaps before a forced release
        #[arg(long)]
        attempt_limit: Option<u32>,

        /// Recent swaps excluded from candidates
        #[arg(long)]
        tabu_window: Option<u32>,
    },

    /// Replay a solution against its instance
    Verify {
        /// Instance file
        #[arg(long)]
        instance: PathBuf,

        /// Solution file
        #[arg(long)]
        solution: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a solver over test folders and report gate counts
    Bench {
        /// Solver command line, run through the shell
        #[arg(long)]
        solver: String,

        /// Directory holding the test folders
        #[arg(long, default_value = "testset")]
        testset_path: PathBuf,

        /// Test folders to run
        #[arg(long, num_args = 1.., default_values_t = vec!["tiny".to_string()])]
        folders: Vec<String>,

        /// Per-case timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Concurrent solver processes
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Generate a random instance
    Generate {
        /// Size class (tiny, xsmall, small, medium, large)
        #[arg(short, long, default_value = "tiny")]
        preset: Preset,

        /// Random seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Route {
            input,
            output,
            warm_start,
            lookahead_weight,
            attempt_limit,
            tabu_window,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            let routing = &mut config.routing;
            if let Some(v) = warm_start {
                routing.warm_start = v;
            }
            if let Some(v) = lookahead_weight {
                routing.lookahead_weight = v;
            }
            if let Some(v) = attempt_limit {
                routing.attempt_limit = v;
            }
            if let Some(v) = tabu_window {
                routing.tabu_window = v;
            }
            config.validate()?;
            debug!(routing = ?config.routing, "resolved configuration");
            route::execute(input.as_deref(), output.as_deref(), config.routing)
        }

        Commands::Verify {
            instance,
            solution,
            json,
        } => verify::execute(&instance, &solution, json),

        Commands::Bench {
            solver,
            testset_path,
            folders,
            timeout,
            jobs,
            json,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(v) = timeout {
                config.bench.timeout_secs = v;
            }
            if let Some(v) = jobs {
                config.bench.jobs = v;
            }
            config.validate()?;
            debug!(bench = ?config.bench, "resolved configuration");
            bench::execute(&solver, &testset_path, &folders, config.bench, json.as_deref()).await
        }

        Commands::Generate {
            preset,
            seed,
            output,
        } => generate::execute(preset, seed, output.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
