//! Tile fetch orchestration with windowed backpressure.
//!
//! The orchestrator drives fetches in fixed windows: it fills a window
//! of up to `window_size` requests, waits for every request in that
//! window to resolve, then admits the next window. Pending futures
//! never exceed one window, and the window in flight is always drained
//! before the run returns, whether it ends normally, by policy, or by
//! cancellation.

use std::fmt;
use std::str::FromStr;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Serialize, Serializer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::coord::TileCoord;

use super::{FetchError, TileFetcher};

/// Default maximum concurrent tile requests in flight.
pub const DEFAULT_WINDOW_SIZE: usize = 500;

/// Hard ceiling on the configured window size.
pub const MAX_WINDOW_SIZE: usize = 2000;

/// Default number of completions between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50;

/// What to do when a tile fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and keep going.
    #[default]
    Continue,
    /// Finish draining the current window, then end the run with an error.
    Abort,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'abort' or 'continue')",
                other
            )),
        }
    }
}

/// Configuration for a fetch run.
///
/// Constructed per call and immutable while the run is active.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum requests in flight at once.
    pub window_size: usize,
    /// Completions between progress log lines.
    pub progress_interval: usize,
    /// Per-tile failure handling.
    pub on_failure: FailurePolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            on_failure: FailurePolicy::Continue,
        }
    }
}

/// A tile that could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub tile: TileCoord,
    /// Serialized as its display message.
    #[serde(serialize_with = "cause_message")]
    pub cause: FetchError,
}

fn cause_message<S: Serializer>(cause: &FetchError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(cause)
}

/// Outcome of a fetch run.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Tiles submitted to the fetcher.
    pub attempted: usize,
    /// Tiles fetched successfully.
    pub succeeded: usize,
    /// Tiles that failed, with their causes.
    pub failures: Vec<FetchFailure>,
    /// True if the abort policy ended the run early.
    pub aborted: bool,
    /// True if cancellation stopped the run before every window ran.
    pub cancelled: bool,
}

/// Drives tile fetches in drain-to-completion windows.
pub struct FetchOrchestrator<F: TileFetcher> {
    fetcher: F,
    config: OrchestratorConfig,
}

impl<F: TileFetcher> FetchOrchestrator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_config(fetcher: F, config: OrchestratorConfig) -> Self {
        // A zero-sized window would never admit work
        let window_size = config.window_size.max(1);
        Self {
            fetcher,
            config: OrchestratorConfig {
                window_size,
                ..config
            },
        }
    }

    /// Fetches every tile, `window_size` at a time.
    ///
    /// Windows are strict barriers: the next window is admitted only
    /// once every request in the current one has resolved. Cancellation
    /// is honored at the same boundaries, so an in-flight window always
    /// drains and no background work outlives this call. Tiles are
    /// fetched in slice order, window by window.
    pub async fn run(&self, tiles: &[TileCoord], cancellation: &CancellationToken) -> FetchReport {
        let total = tiles.len();
        let mut report = FetchReport::default();

        if tiles.is_empty() {
            return report;
        }

        info!(
            tiles = total,
            window_size = self.config.window_size,
            on_failure = %self.config.on_failure,
            "Starting fetch run"
        );

        let mut completions_since_log = 0usize;

        for window in tiles.chunks(self.config.window_size) {
            if cancellation.is_cancelled() {
                report.cancelled = true;
                info!(
                    attempted = report.attempted,
                    remaining = total - report.attempted,
                    "Fetch run cancelled; not admitting further windows"
                );
                break;
            }

            let mut in_flight: FuturesUnordered<_> = window
                .iter()
                .map(|tile| async move { (*tile, self.fetcher.fetch_tile(tile).await) })
                .collect();
            report.attempted += in_flight.len();

            // Drain the whole window before anything else happens
            while let Some((tile, result)) = in_flight.next().await {
                match result {
                    Ok(()) => report.succeeded += 1,
                    Err(cause) => {
                        debug!(tile = %tile, error = %cause, "Tile fetch failed");
                        report.failures.push(FetchFailure { tile, cause });
                    }
                }

                completions_since_log += 1;
                if completions_since_log >= self.config.progress_interval {
                    info!(
                        attempted = report.attempted,
                        succeeded = report.succeeded,
                        failed = report.failures.len(),
                        total,
                        "Fetch progress"
                    );
                    completions_since_log = 0;
                }
            }

            if self.config.on_failure == FailurePolicy::Abort && !report.failures.is_empty() {
                report.aborted = true;
                warn!(
                    failed = report.failures.len(),
                    attempted = report.attempted,
                    "Failure policy is abort; ending run after the drained window"
                );
                break;
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failures.len(),
            aborted = report.aborted,
            cancelled = report.cancelled,
            "Fetch run complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::MockTileFetcher;
    use super::*;
    use std::time::Duration;

    fn tile(zoom: u8, x: u32, y: u32) -> TileCoord {
        TileCoord { zoom, x, y }
    }

    fn tiles(n: u32) -> Vec<TileCoord> {
        (0..n).map(|i| tile(10, i, i)).collect()
    }

    fn config(window_size: usize, on_failure: FailurePolicy) -> OrchestratorConfig {
        OrchestratorConfig {
            window_size,
            on_failure,
            ..OrchestratorConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.window_size, 500);
        assert_eq!(config.progress_interval, 50);
        assert_eq!(config.on_failure, FailurePolicy::Continue);
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!("continue".parse(), Ok(FailurePolicy::Continue));
        assert_eq!("Abort".parse(), Ok(FailurePolicy::Abort));
        assert!("halt".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_zero_window_is_bumped_to_one() {
        let orchestrator = FetchOrchestrator::with_config(
            MockTileFetcher::succeeding(),
            config(0, FailurePolicy::Continue),
        );
        assert_eq!(orchestrator.config.window_size, 1);
    }

    #[tokio::test]
    async fn test_every_tile_is_fetched_exactly_once() {
        let mock = MockTileFetcher::succeeding();
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(3, FailurePolicy::Continue));

        let input = tiles(10);
        let report = orchestrator.run(&input, &CancellationToken::new()).await;

        assert_eq!(report.attempted, 10);
        assert_eq!(report.succeeded, 10);
        assert!(report.failures.is_empty());
        assert!(!report.aborted);
        assert!(!report.cancelled);

        let mut calls = mock.calls();
        calls.sort();
        let mut expected = input;
        expected.sort();
        assert_eq!(calls, expected);
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_the_window() {
        let mock = MockTileFetcher::succeeding().with_default_delay(Duration::from_millis(5));
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(10, FailurePolicy::Continue));

        orchestrator.run(&tiles(35), &CancellationToken::new()).await;

        assert!(
            mock.max_in_flight() <= 10,
            "observed {} concurrent fetches",
            mock.max_in_flight()
        );
        assert_eq!(mock.call_count(), 35);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_window_runs_concurrently() {
        // All futures of one window start before any of them finishes
        let mock = MockTileFetcher::succeeding().with_default_delay(Duration::from_millis(20));
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(10, FailurePolicy::Continue));

        orchestrator.run(&tiles(10), &CancellationToken::new()).await;

        assert_eq!(mock.max_in_flight(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_drains_fully_before_the_next_starts() {
        // Window is {a, b}; a is slow, b is fast. A sliding admission
        // would start c as soon as b resolves. The batch barrier holds
        // c back until a is done too.
        let a = tile(9, 0, 0);
        let b = tile(9, 1, 1);
        let c = tile(9, 2, 2);

        let mock = MockTileFetcher::succeeding()
            .with_default_delay(Duration::from_millis(1))
            .with_delay_for(a, Duration::from_millis(50));
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(2, FailurePolicy::Continue));

        let t0 = tokio::time::Instant::now();
        let report = orchestrator.run(&[a, b, c], &CancellationToken::new()).await;

        assert_eq!(report.succeeded, 3);

        let started = mock.started();
        let (_, c_started) = started
            .iter()
            .find(|(t, _)| *t == c)
            .expect("c was fetched");
        assert!(
            *c_started >= t0 + Duration::from_millis(50),
            "third tile started {:?} after run start, before the first window drained",
            c_started.duration_since(t0)
        );
    }

    #[tokio::test]
    async fn test_abort_policy_stops_after_the_failing_window() {
        let input = tiles(6);
        let failing = input[1];

        let mock = MockTileFetcher::failing_on([failing]);
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(2, FailurePolicy::Abort));

        let report = orchestrator.run(&input, &CancellationToken::new()).await;

        assert!(report.aborted);
        assert_eq!(report.attempted, 2, "only the first window was admitted");
        assert_eq!(report.succeeded, 1, "the window still drained fully");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].tile, failing);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_continue_policy_fetches_everything_despite_failures() {
        let input = tiles(6);
        let failing = input[1];

        let mock = MockTileFetcher::failing_on([failing]);
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(2, FailurePolicy::Continue));

        let report = orchestrator.run(&input, &CancellationToken::new()).await;

        assert!(!report.aborted);
        assert_eq!(report.attempted, 6);
        assert_eq!(report.succeeded, 5);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].tile, failing);
    }

    #[tokio::test]
    async fn test_cancellation_before_the_run_admits_nothing() {
        let mock = MockTileFetcher::succeeding();
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(4, FailurePolicy::Continue));

        let token = CancellationToken::new();
        token.cancel();
        let report = orchestrator.run(&tiles(8), &token).await;

        assert!(report.cancelled);
        assert_eq!(report.attempted, 0);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_drains_the_window_in_flight() {
        let input = tiles(8);
        let token = CancellationToken::new();

        // The token fires while the first window is being fetched
        let mock = MockTileFetcher::succeeding().with_cancel_on(input[0], token.clone());
        let orchestrator =
            FetchOrchestrator::with_config(mock.clone(), config(4, FailurePolicy::Continue));

        let report = orchestrator.run(&input, &token).await;

        assert!(report.cancelled);
        assert_eq!(report.attempted, 4, "the in-flight window still drained");
        assert_eq!(report.succeeded, 4);
        assert_eq!(mock.call_count(), 4, "no later window was admitted");
    }

    #[tokio::test]
    async fn test_empty_tile_list_is_a_no_op() {
        let orchestrator = FetchOrchestrator::new(MockTileFetcher::succeeding());

        let report = orchestrator.run(&[], &CancellationToken::new()).await;

        assert_eq!(report.attempted, 0);
        assert_eq!(report.succeeded, 0);
        assert!(report.failures.is_empty());
        assert!(!report.aborted);
        assert!(!report.cancelled);
    }
}
