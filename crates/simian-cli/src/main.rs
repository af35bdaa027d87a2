//! Simian CLI
//!
//! Command line front end for the Simian perceptual image index.
//!
//! # Commands
//!
//! - `fingerprint`: Print the fingerprint of an image as hex
//! - `compare`: Difference and judgment between two images
//! - `add`: Insert images into an index database
//! - `query`: Find indexed images similar to a query image
//! - `stats`: Shape of the index trie
//!
//! Exit codes: 0 on success, 1 on error, 2 when the database is corrupted.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use simian_core::{LoggingConfig, SimianConfig};

mod commands;
mod error;

use error::CliExitCode;

/// Simian - perceptual image index
#[derive(Parser)]
#[command(name = "simian")]
#[command(version)]
#[command(about = "Find visually similar images with a perceptual fingerprint index")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file; defaults to config/default.toml plus SIMIAN__* variables
    #[arg(long, global = true, env = "SIMIAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fingerprint of an image as hex
    ///
    /// With -vv the quantized 8x8 coefficient block is logged as well.
    Fingerprint(commands::fingerprint::FingerprintArgs),
    /// Compare two images
    ///
    /// Prints the normalised difference (0 = identical) followed by its
    /// judgment, e.g.
    ///   0.0312 (duplicate)
    Compare(commands::compare::CompareArgs),
    /// Add images to an index
    Add(commands::add::AddArgs),
    /// Find indexed images similar to a query image
    ///
    /// Prints one JSON object per match, closest first.
    Query(commands::query::QueryArgs),
    /// Print node and entry counts of an index
    Stats(commands::stats::StatsArgs),
}

fn load_config(path: Option<&Path>) -> simian_core::CoreResult<SimianConfig> {
    match path {
        Some(path) => SimianConfig::from_file(path),
        None => SimianConfig::load(),
    }
}

fn init_logging(verbose: u8, logging: &LoggingConfig) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&logging.level))
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location)
        .with_writer(std::io::stderr);

    if logging.format == "compact" {
        builder.compact().init();
    } else {
        builder.init();
    }
}

fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());
    let logging = match &config {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    init_logging(cli.verbose, &logging);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(CliExitCode::Error as i32);
        }
    };

    let exit_code = match cli.command {
        Commands::Fingerprint(args) => commands::fingerprint::handle_fingerprint(args),
        Commands::Compare(args) => commands::compare::handle_compare(args),
        Commands::Add(args) => commands::add::handle_add(args, &config),
        Commands::Query(args) => commands::query::handle_query(args, &config),
        Commands::Stats(args) => commands::stats::handle_stats(args, &config),
    };

    std::process::exit(exit_code);
}
