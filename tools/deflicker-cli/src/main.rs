//! Deflicker CLI: smooth brightness flicker in timelapse image sequences.
//!
//! Usage:
//!   deflicker run <INPUT_DIR> [OPTIONS]       Deflicker a directory of frames
//!   deflicker analyze <INPUT_DIR> [OPTIONS]   Show brightness, targets and scale factors
//!
//! Frame brightness is adjusted to a rolling mean over `--window` frames.
//! With `--sigma`, outlier pixels are left out of the brightness estimate.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use deflicker_common::config::{AppConfig, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "deflicker",
    about = "Adjust image brightness to get a smooth timelapse",
    version,
    author
)]
struct Cli {
    /// Only output errors and warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Configuration file (default: $XDG_CONFIG_HOME/deflicker/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deflicker all images in a directory
    Run {
        /// Directory holding the input frames
        input_dir: PathBuf,

        /// Output directory [config default: deflickered]
        #[arg(short, long)]
        outdir: Option<PathBuf>,

        /// Window size for the rolling mean [config default: 10]
        #[arg(short, long)]
        window: Option<usize>,

        /// Output format: png|tiff|tif|jpg|jpeg [config default: png]
        #[arg(short, long)]
        format: Option<String>,

        /// Sigma for the sigma clipping (disabled when absent)
        #[arg(short, long)]
        sigma: Option<f64>,
    },

    /// Show per-frame brightness, targets and scale factors without writing
    Analyze {
        /// Directory holding the input frames
        input_dir: PathBuf,

        /// Window size for the rolling mean [config default: 10]
        #[arg(short, long)]
        window: Option<usize>,

        /// Sigma for the sigma clipping (disabled when absent)
        #[arg(short, long)]
        sigma: Option<f64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.quiet || cli.verbose {
        logging.level = LoggingConfig::for_verbosity(cli.quiet, cli.verbose).level;
    }
    deflicker_common::logging::init_logging(&logging);
    tracing::info!("This is deflicker {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run {
            input_dir,
            outdir,
            window,
            format,
            sigma,
        } => commands::run::run(
            input_dir,
            outdir,
            window,
            format,
            sigma,
            &config.defaults,
            cli.quiet,
        ),
        Commands::Analyze {
            input_dir,
            window,
            sigma,
            json,
        } => commands::analyze::run(input_dir, window, sigma, json, &config.defaults, cli.quiet),
    }
}
