//! Tilewarm - Map-tile cache warming
//!
//! This library fetches the tile pyramid under a set of geographic seed
//! points so a remote tile cache is populated before users hit it.
//!
//! # High-Level API
//!
//! For most use cases, the [`warmer`] module provides a facade over the
//! whole flow:
//!
//! ```ignore
//! use tilewarm::cache::DiskCacheProbe;
//! use tilewarm::fetch::HttpTileFetcher;
//! use tilewarm::region::RegionFilter;
//! use tilewarm::warmer::CacheWarmer;
//!
//! let fetcher = HttpTileFetcher::new("https://tiles.example.net/v1")?;
//! let probe = DiskCacheProbe::new("/var/cache/tiles", "pbf");
//! let warmer = CacheWarmer::new(fetcher, probe, RegionFilter::unrestricted());
//!
//! let summary = warmer.run(&seeds, 12, &cancellation).await?;
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod fetch;
pub mod logging;
pub mod pyramid;
pub mod region;
pub mod warmer;

/// Version of the tilewarm library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_is_injected() {
        assert!(!super::VERSION.is_empty());
    }

    #[test]
    fn test_coord_module_exists() {
        // Verify coord module is accessible
        use crate::coord::to_tile_coords;
        let result = to_tile_coords(40.7128, -74.0060, 16);
        assert!(result.is_ok());
    }
}
