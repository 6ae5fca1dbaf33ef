//! Local tile cache inspection
//!
//! The warmer treats the cache as read-only: it probes for existing
//! tiles and leaves population to the tile service being warmed.

mod path;
mod probe;

pub use path::{cache_stats, format_size, tile_path};
pub use probe::{partition_cached, CacheProbe, DiskCacheProbe};
