//! Cache warming facade.
//!
//! Wires the full flow: seed conversion, pyramid expansion, region
//! filtering, cache probing, and the windowed fetch run.
//!
//! # Workflow
//!
//! 1. Convert each seed point to its tile via the coordinate module
//! 2. Expand the seed tiles into the deduplicated frontier
//! 3. Drop tiles whose bounds miss the region of interest
//! 4. Probe the local cache and skip tiles already present
//! 5. Fetch the remainder in drain-to-completion windows
//! 6. Return a summary of every phase
//!
//! # Example
//!
//! ```ignore
//! let warmer = CacheWarmer::new(fetcher, probe, RegionFilter::unrestricted());
//! let summary = warmer.run(&seeds, 12, &cancellation).await?;
//! println!("fetched {} of {} tiles", summary.succeeded, summary.attempted);
//! ```

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::{partition_cached, CacheProbe};
use crate::coord::{CoordError, SeedPoint, TileCoord};
use crate::fetch::{
    FetchError, FetchFailure, FetchOrchestrator, OrchestratorConfig, TileFetcher,
};
use crate::pyramid::{expand, ExpansionError};
use crate::region::{RegionError, RegionFilter};

/// Errors that end a warm run.
///
/// Everything here is fatal to the run as a whole; per-tile fetch
/// failures are carried in the summary instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WarmError {
    #[error(transparent)]
    Coord(#[from] CoordError),
    #[error(transparent)]
    Expansion(#[from] ExpansionError),
    #[error(transparent)]
    Region(#[from] RegionError),
    #[error(transparent)]
    Fetcher(#[from] FetchError),
    /// The abort policy fired. The summary still carries everything
    /// that happened up to and including the drained window.
    #[error("run aborted after {} failed tile(s)", .summary.failed)]
    Aborted { summary: RunSummary },
}

/// Counters for one warm run.
///
/// Constructed fresh per invocation and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Tiles produced by pyramid expansion.
    pub expanded: usize,
    /// Tiles dropped by the region filter.
    pub filtered_out: usize,
    /// Tiles skipped because the local cache already holds them.
    pub skipped_cached: usize,
    /// Tiles submitted to the fetcher.
    pub attempted: usize,
    /// Tiles fetched successfully.
    pub succeeded: usize,
    /// Number of tiles that failed.
    pub failed: usize,
    /// The failing tiles with their causes, in completion order.
    pub failures: Vec<FetchFailure>,
    /// True if an interrupt stopped the run before every window ran.
    pub cancelled: bool,
}

/// What a warm run would fetch, computed without fetching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarmPlan {
    pub expanded: usize,
    pub filtered_out: usize,
    pub skipped_cached: usize,
    /// Tiles a run would fetch, shallow zoom levels first.
    pub to_fetch: Vec<TileCoord>,
}

/// Computes what a warm run would fetch, without fetching.
///
/// Runs the selection phases only: expansion, region filtering, and the
/// cache probe. `tilewarm plan` is this.
pub fn plan<P>(
    probe: &P,
    filter: &RegionFilter,
    seeds: &[SeedPoint],
    max_zoom: u8,
) -> Result<WarmPlan, WarmError>
where
    P: CacheProbe + ?Sized,
{
    let mut seed_tiles = Vec::with_capacity(seeds.len());
    for seed in seeds {
        seed_tiles.push(seed.to_tile()?);
    }

    let frontier = expand(&seed_tiles, max_zoom)?;
    let expanded = frontier.len();

    let accepted: Vec<TileCoord> = frontier
        .into_iter()
        .filter(|tile| filter.accepts(tile))
        .collect();
    let filtered_out = expanded - accepted.len();

    let (cached, mut missing) = partition_cached(probe, accepted);
    missing.sort();

    Ok(WarmPlan {
        expanded,
        filtered_out,
        skipped_cached: cached.len(),
        to_fetch: missing,
    })
}

/// One-shot cache warmer.
///
/// # Type Parameters
///
/// * `F` - Fetcher issuing the per-tile requests
/// * `P` - Probe deciding which tiles are already cached
pub struct CacheWarmer<F: TileFetcher, P: CacheProbe> {
    orchestrator: FetchOrchestrator<F>,
    probe: P,
    filter: RegionFilter,
}

impl<F: TileFetcher, P: CacheProbe> CacheWarmer<F, P> {
    /// Creates a warmer with the default fetch configuration.
    pub fn new(fetcher: F, probe: P, filter: RegionFilter) -> Self {
        Self::with_config(fetcher, probe, filter, OrchestratorConfig::default())
    }

    /// Creates a warmer with a custom fetch configuration.
    pub fn with_config(
        fetcher: F,
        probe: P,
        filter: RegionFilter,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            orchestrator: FetchOrchestrator::with_config(fetcher, config),
            probe,
            filter,
        }
    }

    /// Warms every tile reachable from the seeds down to `max_zoom`.
    ///
    /// Validation problems (bad seed, bad zoom) fail before anything is
    /// fetched. Per-tile failures land in the summary; the run only
    /// returns `WarmError::Aborted` when the abort policy is active and
    /// at least one tile failed. Cancellation is graceful and reported
    /// through `RunSummary::cancelled`, not as an error.
    pub async fn run(
        &self,
        seeds: &[SeedPoint],
        max_zoom: u8,
        cancellation: &CancellationToken,
    ) -> Result<RunSummary, WarmError> {
        let warm_plan = plan(&self.probe, &self.filter, seeds, max_zoom)?;

        info!(
            seeds = seeds.len(),
            max_zoom,
            expanded = warm_plan.expanded,
            filtered_out = warm_plan.filtered_out,
            skipped_cached = warm_plan.skipped_cached,
            to_fetch = warm_plan.to_fetch.len(),
            "Warm plan ready"
        );

        let report = self.orchestrator.run(&warm_plan.to_fetch, cancellation).await;

        let summary = RunSummary {
            expanded: warm_plan.expanded,
            filtered_out: warm_plan.filtered_out,
            skipped_cached: warm_plan.skipped_cached,
            attempted: report.attempted,
            succeeded: report.succeeded,
            failed: report.failures.len(),
            failures: report.failures,
            cancelled: report.cancelled,
        };

        info!(
            expanded = summary.expanded,
            filtered_out = summary.filtered_out,
            skipped_cached = summary.skipped_cached,
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Warm run finished"
        );

        if report.aborted {
            return Err(WarmError::Aborted { summary });
        }

        Ok(summary)
    }
}
