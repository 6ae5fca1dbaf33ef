//! Warm command - expand seed points and fetch every missing tile.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use tilewarm::cache::DiskCacheProbe;
use tilewarm::config::clamp_window_size;
use tilewarm::fetch::{FailurePolicy, HttpTileFetcher, OrchestratorConfig};
use tilewarm::warmer::{CacheWarmer, RunSummary, WarmError};

use super::common::{resolve_region, resolve_seeds, FailureMode};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the warm command.
pub struct WarmArgs {
    pub seeds: Vec<String>,
    pub max_zoom: Option<u8>,
    pub base_url: Option<String>,
    pub region: Option<PathBuf>,
    pub window_size: Option<usize>,
    pub on_failure: Option<FailureMode>,
    pub timeout: Option<u64>,
    pub progress_interval: Option<usize>,
    pub cache_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub json: bool,
}

/// Run the warm command.
pub fn run(args: WarmArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_console(!args.json)?;
    runner.log_startup("warm");
    let config = runner.config();

    // Resolve settings: CLI > config > default
    let seeds = resolve_seeds(&args.seeds, config)?;
    let filter = resolve_region(args.region.clone(), config)?;
    let max_zoom = args.max_zoom.unwrap_or(config.warm.max_zoom);

    let base_url = args
        .base_url
        .clone()
        .or_else(|| config.fetch.base_url.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No tile service URL given. Pass --base-url or set fetch.base_url in the config file."
                    .to_string(),
            )
        })?;

    let timeout_secs = args.timeout.unwrap_or(config.fetch.timeout);
    let window_size = clamp_window_size(args.window_size.unwrap_or(config.fetch.window_size));
    let on_failure = args
        .on_failure
        .map(FailurePolicy::from)
        .unwrap_or(config.fetch.on_failure);
    let progress_interval = args
        .progress_interval
        .unwrap_or(config.fetch.progress_interval);

    let cache_dir = args
        .cache_dir
        .clone()
        .unwrap_or_else(|| config.cache.directory.clone());
    let extension = args
        .extension
        .clone()
        .unwrap_or_else(|| config.cache.extension.clone());

    if !args.json {
        println!("Warming tile cache...");
        println!("  Service:    {}", base_url);
        println!("  Seeds:      {}", seeds.len());
        println!("  Max zoom:   {}", max_zoom);
        println!("  Cache:      {}", cache_dir.display());
        if let Some(region) = args.region.as_ref().or(config.warm.region.as_ref()) {
            println!("  Region:     {}", region.display());
        }
        println!("  Window:     {} requests", window_size);
        println!("  On failure: {}", on_failure);
        println!();
        println!("Press Ctrl+C to stop after the current window");
        println!();
    }

    let fetcher =
        HttpTileFetcher::with_timeout(base_url, timeout_secs).map_err(CliError::Fetcher)?;
    let probe = DiskCacheProbe::new(cache_dir, extension);
    let warmer = CacheWarmer::with_config(
        fetcher,
        probe,
        filter,
        OrchestratorConfig {
            window_size,
            progress_interval,
            on_failure,
        },
    );

    // Set up signal handler for graceful shutdown
    let cancellation = CancellationToken::new();
    let handler_token = cancellation.clone();
    let quiet = args.json;

    ctrlc::set_handler(move || {
        if !quiet {
            println!();
            println!("Received shutdown signal, draining in-flight requests...");
        }
        handler_token.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Config(format!("Failed to start async runtime: {}", e)))?;
    let summary = match runtime.block_on(warmer.run(&seeds, max_zoom, &cancellation)) {
        Ok(summary) => summary,
        Err(WarmError::Aborted { summary }) => {
            if args.json {
                // Emit the partial summary before the error exit
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            return Err(CliError::Warm(WarmError::Aborted { summary }));
        }
        Err(e) => return Err(CliError::Warm(e)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Print the end-of-run summary.
fn print_summary(summary: &RunSummary) {
    println!();
    println!("Warm Summary");
    println!("────────────");
    println!("  Tiles expanded: {}", summary.expanded);
    if summary.filtered_out > 0 {
        println!("  Outside region: {}", summary.filtered_out);
    }
    println!("  Already cached: {}", summary.skipped_cached);
    println!(
        "  Fetched:        {} of {} attempted ({} failed)",
        summary.succeeded, summary.attempted, summary.failed
    );

    if !summary.failures.is_empty() {
        println!();
        println!("Failed tiles:");
        for failure in summary.failures.iter().take(10) {
            println!("  {} - {}", failure.tile, failure.cause);
        }
        if summary.failures.len() > 10 {
            println!(
                "  ... and {} more (see the log file)",
                summary.failures.len() - 10
            );
        }
    }

    if summary.cancelled {
        println!();
        println!("Run interrupted; remaining tiles were not requested.");
    }
}
