//! Cache inspection CLI commands.

use clap::Subcommand;
use tilewarm::cache::{cache_stats, format_size};
use tilewarm::config::ConfigFile;

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show tile cache statistics
    Stats,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let cache_dir = &config.cache.directory;

    match action {
        CacheAction::Stats => {
            println!("Tile cache: {}", cache_dir.display());

            let (files, bytes) = cache_stats(cache_dir, &config.cache.extension);
            println!("  Tiles: {}", files);
            println!("  Size:  {}", format_size(bytes));
            Ok(())
        }
    }
}
