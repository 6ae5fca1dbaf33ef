//! Tilewarm CLI - Command-line interface
//!
//! This binary provides a command-line interface to the tilewarm library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::common::FailureMode;
use commands::config::ConfigCommands;
use commands::init::InitArgs;
use commands::plan::PlanArgs;
use commands::warm::WarmArgs;

#[derive(Parser)]
#[command(name = "tilewarm")]
#[command(version)]
#[command(about = "Warm a remote map-tile cache from geographic seed points", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand seed points into tile pyramids and fetch every missing tile
    Warm {
        /// Seed point as lat,lon,zoom (repeatable)
        #[arg(long = "seed", value_name = "LAT,LON,ZOOM")]
        seeds: Vec<String>,

        /// Deepest zoom level to expand to
        #[arg(long)]
        max_zoom: Option<u8>,

        /// Tile service base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Polygon boundary file restricting the run
        #[arg(long, value_name = "FILE")]
        region: Option<PathBuf>,

        /// Maximum requests in flight at once
        #[arg(long)]
        window_size: Option<usize>,

        /// What to do when a tile fails
        #[arg(long, value_enum)]
        on_failure: Option<FailureMode>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Completions between progress reports
        #[arg(long)]
        progress_interval: Option<usize>,

        /// Tile cache root directory
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Cached tile file extension
        #[arg(long)]
        extension: Option<String>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what a warm run would fetch, without fetching
    Plan {
        /// Seed point as lat,lon,zoom (repeatable)
        #[arg(long = "seed", value_name = "LAT,LON,ZOOM")]
        seeds: Vec<String>,

        /// Deepest zoom level to expand to
        #[arg(long)]
        max_zoom: Option<u8>,

        /// Polygon boundary file restricting the run
        #[arg(long, value_name = "FILE")]
        region: Option<PathBuf>,

        /// Tile cache root directory
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Cached tile file extension
        #[arg(long)]
        extension: Option<String>,

        /// List every tile the run would fetch
        #[arg(long)]
        tiles: bool,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect the tile cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Create the configuration file with default settings
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Warm {
            seeds,
            max_zoom,
            base_url,
            region,
            window_size,
            on_failure,
            timeout,
            progress_interval,
            cache_dir,
            extension,
            json,
        } => commands::warm::run(WarmArgs {
            seeds,
            max_zoom,
            base_url,
            region,
            window_size,
            on_failure,
            timeout,
            progress_interval,
            cache_dir,
            extension,
            json,
        }),
        Commands::Plan {
            seeds,
            max_zoom,
            region,
            cache_dir,
            extension,
            tiles,
            json,
        } => commands::plan::run(PlanArgs {
            seeds,
            max_zoom,
            region,
            cache_dir,
            extension,
            tiles,
            json,
        }),
        Commands::Cache { action } => commands::cache::run(action),
        Commands::Init { force } => commands::init::run(InitArgs { force }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
