//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::coord::SeedPoint;
use crate::fetch::FailurePolicy;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Warm run settings
    pub warm: WarmSettings,
    /// Fetch settings
    pub fetch: FetchSettings,
    /// Cache settings
    pub cache: CacheSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Warm run configuration.
#[derive(Debug, Clone)]
pub struct WarmSettings {
    /// Seed points expansion starts from.
    /// Config format: semicolon-separated `lat,lon,zoom` triples.
    pub seeds: Vec<SeedPoint>,
    /// Deepest zoom level to expand to.
    /// Default: 12
    pub max_zoom: u8,
    /// Path to a region-of-interest polygon file (None = whole world).
    pub region: Option<PathBuf>,
}

/// Fetch configuration.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Base URL of the tile service, e.g. "https://tiles.example.net/v1".
    /// Required for warm runs; can also come from the command line.
    pub base_url: Option<String>,
    /// Maximum requests in flight at once.
    /// Default: 500
    ///
    /// Hard limits: 1-2000 (values outside this range are clamped).
    /// The ceiling keeps a single run from overwhelming the tile service.
    pub window_size: usize,
    /// What to do when a tile fetch fails: "continue" or "abort".
    pub on_failure: FailurePolicy,
    /// Timeout in seconds for a single tile request.
    /// Default: 30 seconds.
    pub timeout: u64,
    /// Completions between progress log lines.
    /// Default: 50
    pub progress_interval: usize,
}

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Cache directory path
    pub directory: PathBuf,
    /// File extension of cached tiles (default: pbf)
    pub extension: String,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
