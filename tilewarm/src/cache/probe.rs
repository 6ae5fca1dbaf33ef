//! Cache presence probing.
//!
//! Decides which tiles already exist on disk so the warmer fetches only
//! what is missing. Probing fails open: an unreadable path counts as a
//! miss and the tile is fetched redundantly rather than skipped.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use crate::coord::TileCoord;

use super::path::tile_path;

/// Trait for checking whether a tile already exists in the local cache.
///
/// This abstraction enables testing with mock probes and potentially
/// supporting alternative cache layouts.
pub trait CacheProbe: Send + Sync {
    /// True if the tile is already cached.
    ///
    /// Never fails; implementations map probe errors to a miss.
    fn is_cached(&self, tile: &TileCoord) -> bool;
}

/// Filesystem probe over the `<root>/<zoom>/<x>/<y>.<extension>` layout.
pub struct DiskCacheProbe {
    cache_root: PathBuf,
    extension: String,
}

impl DiskCacheProbe {
    pub fn new(cache_root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            cache_root: cache_root.into(),
            extension: extension.into(),
        }
    }
}

impl CacheProbe for DiskCacheProbe {
    fn is_cached(&self, tile: &TileCoord) -> bool {
        // Path::exists already maps every I/O error to false
        tile_path(&self.cache_root, tile, &self.extension).exists()
    }
}

/// Splits tiles into `(cached, missing)` by probing in parallel.
///
/// Presence checks are independent metadata reads, so the partition
/// runs across the rayon pool.
pub fn partition_cached<P>(probe: &P, tiles: Vec<TileCoord>) -> (Vec<TileCoord>, Vec<TileCoord>)
where
    P: CacheProbe + ?Sized,
{
    let (cached, missing): (Vec<_>, Vec<_>) =
        tiles.into_par_iter().partition(|tile| probe.is_cached(tile));

    debug!(
        cached = cached.len(),
        missing = missing.len(),
        "Cache probe complete"
    );

    (cached, missing)
}
