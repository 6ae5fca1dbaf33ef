//! Shared argument types and CLI/config resolution helpers.

use std::path::PathBuf;

use clap::ValueEnum;
use tilewarm::config::ConfigFile;
use tilewarm::coord::SeedPoint;
use tilewarm::fetch::FailurePolicy;
use tilewarm::region::{RegionFilter, RegionOfInterest};

use crate::error::CliError;

/// Per-tile failure handling for the warm command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FailureMode {
    /// Record failed tiles and keep fetching
    Continue,
    /// Stop submitting new requests after the first failure
    Abort,
}

impl From<FailureMode> for FailurePolicy {
    fn from(mode: FailureMode) -> Self {
        match mode {
            FailureMode::Continue => FailurePolicy::Continue,
            FailureMode::Abort => FailurePolicy::Abort,
        }
    }
}

/// Resolve seed points from CLI arguments and config.
///
/// CLI seeds take precedence over config seeds; at least one source
/// must provide them.
pub fn resolve_seeds(cli_seeds: &[String], config: &ConfigFile) -> Result<Vec<SeedPoint>, CliError> {
    if !cli_seeds.is_empty() {
        let mut seeds = Vec::with_capacity(cli_seeds.len());
        for raw in cli_seeds {
            let seed: SeedPoint = raw
                .parse()
                .map_err(|e| CliError::Config(format!("Invalid seed '{}': {}", raw, e)))?;
            seeds.push(seed);
        }
        return Ok(seeds);
    }

    if config.warm.seeds.is_empty() {
        return Err(CliError::Config(
            "No seed points given. Pass --seed lat,lon,zoom or set warm.seeds in the config file."
                .to_string(),
        ));
    }

    Ok(config.warm.seeds.clone())
}

/// Resolve the region filter from CLI arguments and config.
///
/// Without a boundary file from either source every tile is accepted.
pub fn resolve_region(
    cli_region: Option<PathBuf>,
    config: &ConfigFile,
) -> Result<RegionFilter, CliError> {
    let path = cli_region.or_else(|| config.warm.region.clone());

    match path {
        Some(path) => {
            let region = RegionOfInterest::from_json_file(&path)?;
            Ok(RegionFilter::within(region))
        }
        None => Ok(RegionFilter::unrestricted()),
    }
}
