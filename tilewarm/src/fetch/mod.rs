//! Tile fetching
//!
//! Issues one GET per tile against the remote tile service. Any 2xx
//! answer means the far side now holds the tile; the body itself is
//! opaque and discarded. The [`orchestrator`] submodule bounds how many
//! requests are in flight at once.

mod orchestrator;

pub use orchestrator::{
    FailurePolicy, FetchFailure, FetchOrchestrator, FetchReport, OrchestratorConfig,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE,
};

use std::future::Future;

use thiserror::Error;
use tracing::{trace, warn};

use crate::coord::TileCoord;

/// Default User-Agent string for HTTP requests.
/// Some tile servers reject requests without one.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Per-tile fetch failures.
///
/// A failed tile never aborts its siblings in the same window; the
/// orchestrator records the failure and the run policy decides what
/// happens next.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),
    /// The service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Request URL for a tile under a service root.
///
/// # Example
///
/// ```
/// use tilewarm::coord::TileCoord;
/// use tilewarm::fetch::tile_url;
///
/// let tile = TileCoord { zoom: 9, x: 163, y: 391 };
///
/// assert_eq!(
///     tile_url("https://tiles.example.net/v1", &tile),
///     "https://tiles.example.net/v1/9/163/391.pbf"
/// );
/// ```
pub fn tile_url(base_url: &str, tile: &TileCoord) -> String {
    format!(
        "{}/{}/{}/{}.pbf",
        base_url.trim_end_matches('/'),
        tile.zoom,
        tile.x,
        tile.y
    )
}

/// Trait for issuing a single tile fetch.
///
/// This abstraction lets the orchestrator run against instrumented mock
/// fetchers in tests.
pub trait TileFetcher: Send + Sync {
    /// Fetches one tile. Success means the remote cache now holds it.
    fn fetch_tile(&self, tile: &TileCoord) -> impl Future<Output = Result<(), FetchError>> + Send;
}

/// Fetcher backed by a pooled async reqwest client.
///
/// Tuned for many small parallel requests:
/// - Large connection pool with high idle limits
/// - TCP keepalive to maintain warm connections
/// - TCP nodelay for reduced latency
#[derive(Clone)]
pub struct HttpTileFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTileFetcher {
    /// Creates a fetcher with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a fetcher with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            // Connection pooling - keep many connections alive for parallel requests
            .pool_max_idle_per_host(128)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            // TCP optimizations
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl TileFetcher for HttpTileFetcher {
    async fn fetch_tile(&self, tile: &TileCoord) -> Result<(), FetchError> {
        let url = tile_url(&self.base_url, tile);
        trace!(url = %url, "Tile request starting");

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    url = %url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "Tile request failed"
                );
                return Err(FetchError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Tile request rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        // Drain and discard the body; warming only needs the service to
        // have produced the tile
        response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        trace!(url = %url, "Tile warmed");
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    /// Scriptable fetcher for orchestration tests.
    ///
    /// Records every call, tracks the concurrency high-water mark, and
    /// can fail or delay chosen tiles. Clones share the recorded state.
    #[derive(Clone, Default)]
    pub struct MockTileFetcher {
        fail: HashSet<TileCoord>,
        delays: HashMap<TileCoord, Duration>,
        default_delay: Option<Duration>,
        cancel_on: Option<(TileCoord, CancellationToken)>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
        calls: Arc<Mutex<Vec<TileCoord>>>,
        started: Arc<Mutex<Vec<(TileCoord, tokio::time::Instant)>>>,
    }

    impl MockTileFetcher {
        pub fn succeeding() -> Self {
            Self::default()
        }

        pub fn failing_on(tiles: impl IntoIterator<Item = TileCoord>) -> Self {
            MockTileFetcher {
                fail: tiles.into_iter().collect(),
                ..Self::default()
            }
        }

        pub fn with_default_delay(mut self, delay: Duration) -> Self {
            self.default_delay = Some(delay);
            self
        }

        pub fn with_delay_for(mut self, tile: TileCoord, delay: Duration) -> Self {
            self.delays.insert(tile, delay);
            self
        }

        /// Cancels the token as soon as the given tile starts fetching.
        pub fn with_cancel_on(mut self, tile: TileCoord, token: CancellationToken) -> Self {
            self.cancel_on = Some((tile, token));
            self
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        pub fn calls(&self) -> Vec<TileCoord> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn started(&self) -> Vec<(TileCoord, tokio::time::Instant)> {
            self.started.lock().unwrap().clone()
        }
    }

    impl TileFetcher for MockTileFetcher {
        async fn fetch_tile(&self, tile: &TileCoord) -> Result<(), FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.started
                .lock()
                .unwrap()
                .push((*tile, tokio::time::Instant::now()));

            if let Some((trigger, token)) = &self.cancel_on {
                if trigger == tile {
                    token.cancel();
                }
            }

            if let Some(delay) = self.delays.get(tile).copied().or(self.default_delay) {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(*tile);

            if self.fail.contains(tile) {
                Err(FetchError::Transport("scripted failure".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_tile_url_construction() {
        let tile = TileCoord {
            zoom: 9,
            x: 163,
            y: 391,
        };

        assert_eq!(
            tile_url("https://tiles.example.net/v1", &tile),
            "https://tiles.example.net/v1/9/163/391.pbf"
        );
    }

    #[test]
    fn test_tile_url_trims_trailing_slash() {
        let tile = TileCoord {
            zoom: 8,
            x: 71,
            y: 93,
        };

        assert_eq!(
            tile_url("http://localhost:8080/", &tile),
            "http://localhost:8080/8/71/93.pbf"
        );
    }

    #[test]
    fn test_tile_url_zoom_zero() {
        let tile = TileCoord { zoom: 0, x: 0, y: 0 };

        assert_eq!(tile_url("http://t.example", &tile), "http://t.example/0/0/0.pbf");
    }

    #[tokio::test]
    async fn test_mock_fetcher_success_and_failure() {
        let failing = TileCoord {
            zoom: 9,
            x: 163,
            y: 391,
        };
        let passing = TileCoord {
            zoom: 9,
            x: 163,
            y: 390,
        };
        let mock = MockTileFetcher::failing_on([failing]);

        assert!(mock.fetch_tile(&passing).await.is_ok());
        assert!(matches!(
            mock.fetch_tile(&failing).await,
            Err(FetchError::Transport(_))
        ));
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_http_fetcher_builds() {
        let fetcher = HttpTileFetcher::new("https://tiles.example.net");
        assert!(fetcher.is_ok());
    }
}
