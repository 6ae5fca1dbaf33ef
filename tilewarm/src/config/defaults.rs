//! Default values and constants for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants, the window-size clamp, and the
//! `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::fetch::{FailurePolicy, MAX_WINDOW_SIZE};

// =============================================================================
// Warm defaults
// =============================================================================

/// Default deepest zoom level to expand to.
/// One seed tile expanded to zoom 12 from zoom 6 is ~5.6M tiles; deeper
/// runs should narrow the region or raise the seed zoom.
pub const DEFAULT_MAX_ZOOM: u8 = 12;

// =============================================================================
// Window size limits
// =============================================================================

/// Minimum fetch window size.
pub const MIN_WINDOW_SIZE: usize = 1;

/// Clamps the fetch window size to valid range and logs a warning if clamped.
pub fn clamp_window_size(value: usize) -> usize {
    if value < MIN_WINDOW_SIZE {
        tracing::warn!(
            requested = value,
            min = MIN_WINDOW_SIZE,
            max = MAX_WINDOW_SIZE,
            "window_size below minimum, clamping to {}",
            MIN_WINDOW_SIZE
        );
        MIN_WINDOW_SIZE
    } else if value > MAX_WINDOW_SIZE {
        tracing::warn!(
            requested = value,
            min = MIN_WINDOW_SIZE,
            max = MAX_WINDOW_SIZE,
            "window_size above maximum, clamping to {} (prevents tile service overload)",
            MAX_WINDOW_SIZE
        );
        MAX_WINDOW_SIZE
    } else {
        value
    }
}

// =============================================================================
// Cache defaults
// =============================================================================

/// Default file extension for cached tiles.
pub const DEFAULT_TILE_EXTENSION: &str = "pbf";

// =============================================================================
// ConfigFile::default()
// =============================================================================

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tilewarm");

        Self {
            warm: WarmSettings {
                seeds: Vec::new(),
                max_zoom: DEFAULT_MAX_ZOOM,
                region: None,
            },
            fetch: FetchSettings {
                base_url: None,
                window_size: crate::fetch::DEFAULT_WINDOW_SIZE,
                on_failure: FailurePolicy::default(),
                timeout: crate::fetch::DEFAULT_TIMEOUT_SECS,
                progress_interval: crate::fetch::DEFAULT_PROGRESS_INTERVAL,
            },
            cache: CacheSettings {
                directory: cache_dir,
                extension: DEFAULT_TILE_EXTENSION.to_string(),
            },
            logging: LoggingSettings {
                file: config_dir.join("tilewarm.log"),
            },
        }
    }
}
