//! Phototag CLI - photo metadata inspection and cached AI keyword tagging.
//!
//! # Usage
//!
//! ```bash
//! # Report file, EXIF and GPS metadata for a folder
//! phototag inspect ~/Pictures/trip --recursive
//!
//! # Generate stock-photo keywords (cached, so re-runs are free)
//! phototag tag beach.jpg
//!
//! # Look at the tag cache
//! phototag cache stats
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use phototag_core::Config;

mod cli;
mod logging;

/// Phototag - inspect photo metadata and generate cached AI keywords.
#[derive(Parser, Debug)]
#[command(name = "phototag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "PHOTOTAG_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print file, image, EXIF and GPS metadata for photos in a directory
    Inspect(cli::inspect::InspectArgs),

    /// Generate descriptive keywords for photos via a vision API
    Tag(cli::tag::TagArgs),

    /// Inspect and manage the tag cache
    Cache(cli::cache::CacheArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings use eprintln.
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = load_config(&config_path, cli.config.is_some())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Phototag v{}", phototag_core::VERSION);

    match cli.command {
        Commands::Inspect(args) => cli::inspect::execute(args, &config),
        Commands::Tag(args) => cli::tag::execute(args, config).await,
        Commands::Cache(args) => cli::cache::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args, &config, &config_path),
    }
}

/// Load the config file.
///
/// A broken file at the default location only warns, so a bad config never
/// locks the user out of `phototag config init --force`. A broken file the
/// user named explicitly is an error.
fn load_config(path: &std::path::Path, explicit: bool) -> anyhow::Result<Config> {
    if !path.exists() {
        if explicit {
            eprintln!(
                "Warning: config file {} not found, using defaults",
                path.display()
            );
        }
        return Ok(Config::default());
    }

    match Config::load_from(path) {
        Ok(config) => Ok(config),
        Err(e) if explicit => {
            Err(e).with_context(|| format!("Failed to load config from {}", path.display()))
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `phototag config path`."
            );
            Ok(Config::default())
        }
    }
}
