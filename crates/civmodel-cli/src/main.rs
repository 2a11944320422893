//! civmodel CLI - run, scan and inspect the civilization meta-model.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "civmodel")]
#[command(author, version, about = "civmodel - innovation dynamics of a two-group civilization", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default civmodel.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run a single simulation
    Run {
        /// Start from a named preset instead of the project model
        #[arg(short, long)]
        preset: Option<String>,

        /// Exploration freedom of the dominant group
        #[arg(short, long)]
        exploration: Option<f64>,

        /// Activation of the suppressed group
        #[arg(short, long)]
        activation: Option<f64>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of steps
        #[arg(short, long, default_value = "300")]
        steps: usize,

        /// Write the trajectory (.csv) or full output (.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Scan the exploration/activation plane
    Scan {
        /// Grid points per axis (overrides both axes in civmodel.toml)
        #[arg(short, long)]
        resolution: Option<usize>,

        /// Comma-separated seeds, e.g. "42,43,44"
        #[arg(long)]
        seeds: Option<String>,

        /// Steps per run
        #[arg(short, long)]
        steps: Option<usize>,

        /// Worker threads (default: all cores)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Write the grid as .csv or .json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the historical presets
    Presets,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run {
            preset,
            exploration,
            activation,
            seed,
            steps,
            output,
        } => commands::run::run(commands::run::RunArgs {
            preset,
            exploration,
            activation,
            seed,
            steps,
            output,
            verbose: cli.verbose,
        }),
        Commands::Scan {
            resolution,
            seeds,
            steps,
            workers,
            output,
        } => commands::scan::run(commands::scan::ScanArgs {
            resolution,
            seeds,
            steps,
            workers,
            output,
        }),
        Commands::Presets => commands::presets::run(),
    }
}
