//! Cache path construction and maintenance.

use std::path::{Path, PathBuf};

use crate::coord::TileCoord;

/// Construct the on-disk path for a cached tile.
///
/// Tiles are laid out by zoom level and column:
/// ```text
/// <cache_root>/<zoom>/<x>/<y>.<extension>
/// ```
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use tilewarm::cache::tile_path;
/// use tilewarm::coord::TileCoord;
///
/// let root = PathBuf::from("/var/cache/tiles");
/// let tile = TileCoord { zoom: 9, x: 163, y: 391 };
///
/// assert_eq!(
///     tile_path(&root, &tile, "pbf"),
///     PathBuf::from("/var/cache/tiles/9/163/391.pbf")
/// );
/// ```
pub fn tile_path(cache_root: &Path, tile: &TileCoord, extension: &str) -> PathBuf {
    cache_root
        .join(tile.zoom.to_string())
        .join(tile.x.to_string())
        .join(format!("{}.{}", tile.y, extension))
}

/// File count and total size of the cached tiles under a root.
///
/// Walks the `<root>/<zoom>/<x>/<y>.<extension>` layout; unreadable
/// entries are skipped rather than reported.
pub fn cache_stats(cache_root: &Path, extension: &str) -> (usize, u64) {
    let pattern = format!("{}/*/*/*.{}", cache_root.display(), extension);

    let mut file_count = 0usize;
    let mut total_bytes = 0u64;
    if let Ok(paths) = glob::glob(&pattern) {
        for path in paths.flatten() {
            if let Ok(meta) = std::fs::metadata(&path) {
                file_count += 1;
                total_bytes += meta.len();
            }
        }
    }

    (file_count, total_bytes)
}

/// Format a byte count for display (e.g. `117.73 MB`).
pub fn format_size(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
