//! Arena CLI - Command-line interface for running headless Spirit Arena matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Spirit Arena - A deterministic real-time arena simulation
#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log simulation events (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single seeded match
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Config file (TOML, default: built-in defaults)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Round length in seconds (overrides the config)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Simulation step in milliseconds (default: one 60 Hz frame)
        #[arg(long)]
        tick: Option<f64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run many matches in parallel and aggregate statistics
    Batch {
        /// Number of matches to run (default: 100)
        #[arg(short = 'n', long, default_value = "100")]
        matches: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Config file (TOML, default: built-in defaults)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Round length in seconds (overrides the config)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Simulation step in milliseconds (default: one 60 Hz frame)
        #[arg(long)]
        tick: Option<f64>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Print the default configuration as TOML
    Config,

    /// Validate a config file
    Validate {
        /// Config file to validate
        #[arg(required = true)]
        config: std::path::PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Run {
            seed,
            config,
            duration,
            tick,
            format,
        } => cli::run::execute(seed, config.as_deref(), duration, tick, format),

        Commands::Batch {
            matches,
            seed,
            threads,
            config,
            duration,
            tick,
            format,
            progress,
        } => cli::batch::execute(matches, seed, threads, config.as_deref(), duration, tick, format, progress),

        Commands::Config => cli::config::execute(),

        Commands::Validate { config } => cli::validate::execute(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
