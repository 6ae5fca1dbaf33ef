//! Configuration handling for ~/.tilewarm/config.ini.
//!
//! Settings structs live in [`settings`], constants and the default
//! configuration in [`defaults`], INI parsing in [`parser`], and
//! serialization in [`writer`]. [`file`] ties them together with the
//! load/save entry points.

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{clamp_window_size, DEFAULT_MAX_ZOOM, DEFAULT_TILE_EXTENSION, MIN_WINDOW_SIZE};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{CacheSettings, ConfigFile, FetchSettings, LoggingSettings, WarmSettings};
