//! Plan command - show what a warm run would fetch, without fetching.

use std::path::PathBuf;

use tilewarm::cache::DiskCacheProbe;
use tilewarm::config::ConfigFile;
use tilewarm::warmer;

use super::common::{resolve_region, resolve_seeds};
use crate::error::CliError;

/// Arguments for the plan command.
pub struct PlanArgs {
    pub seeds: Vec<String>,
    pub max_zoom: Option<u8>,
    pub region: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub tiles: bool,
    pub json: bool,
}

/// Run the plan command.
///
/// Needs no tile service URL: the selection phases read only the seed
/// points, the region boundary, and the local cache.
pub fn run(args: PlanArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    let seeds = resolve_seeds(&args.seeds, &config)?;
    let filter = resolve_region(args.region.clone(), &config)?;
    let max_zoom = args.max_zoom.unwrap_or(config.warm.max_zoom);

    let cache_dir = args
        .cache_dir
        .clone()
        .unwrap_or_else(|| config.cache.directory.clone());
    let extension = args
        .extension
        .clone()
        .unwrap_or_else(|| config.cache.extension.clone());

    let probe = DiskCacheProbe::new(cache_dir, extension);
    let plan = warmer::plan(&probe, &filter, &seeds, max_zoom)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "Warm plan for {} seed(s) down to zoom {}",
        seeds.len(),
        max_zoom
    );
    println!("  Tiles expanded: {}", plan.expanded);
    if plan.filtered_out > 0 {
        println!("  Outside region: {}", plan.filtered_out);
    }
    println!("  Already cached: {}", plan.skipped_cached);
    println!("  To fetch:       {}", plan.to_fetch.len());

    if args.tiles && !plan.to_fetch.is_empty() {
        println!();
        for tile in &plan.to_fetch {
            println!("{}", tile);
        }
    }

    Ok(())
}
