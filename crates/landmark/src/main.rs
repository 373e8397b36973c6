//! Landmark CLI - zero-shot landmark classification over HTTP.
//!
//! Landmark loads a CLIP model once, encodes a fixed set of candidate labels,
//! and answers `POST /classify` uploads with the best-matching label and a
//! confidence percentage.
//!
//! # Usage
//!
//! ```bash
//! # Fetch the default model
//! landmark models download
//!
//! # Start the HTTP service
//! landmark serve --port 3030
//!
//! # Classify a local file with the same pipeline
//! landmark classify photo.jpg
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Landmark - zero-shot landmark classification over HTTP.
#[derive(Parser, Debug)]
#[command(name = "landmark")]
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
    #[arg(long, global = true, env = "LANDMARK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP classification service
    Serve(cli::serve::ServeArgs),

    /// Classify a single image file and print the result
    Classify(cli::classify::ClassifyArgs),

    /// Manage CLIP models (download, list, etc.)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `landmark config path`."
            );
            landmark_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Landmark v{}", landmark_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config_path).await,
        Commands::Classify(args) => cli::classify::execute(args, config_path).await,
        Commands::Models(args) => cli::models::execute(args, config_path).await,
        Commands::Config(args) => cli::config::execute(args, config_path).await,
    }
}
