//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let seeds = config
        .warm
        .seeds
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    let region = config
        .warm
        .region
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let base_url = config.fetch.base_url.as_deref().unwrap_or("");

    format!(
        r#"[warm]
; Seed points expansion starts from, as semicolon-separated lat,lon,zoom triples
; Example: seeds = 37.7749,-122.4194,7; 40.7128,-74.0060,8
seeds = {}
; Deepest zoom level to expand to (default: 12)
; Every extra level roughly quadruples the tile count
max_zoom = {}
; Path to a region-of-interest polygon file (optional)
; JSON array of [lon, lat] vertices; tiles outside the polygon are skipped
region = {}

[fetch]
; Base URL of the tile service
; Tiles are requested as <base_url>/<zoom>/<x>/<y>.pbf
; Can also be passed as --base-url on the command line
base_url = {}
; Maximum requests in flight at once (default: 500, clamped to 1-2000)
window_size = {}
; What to do when a tile fetch fails (default: continue)
;   continue - record the failure and keep going
;   abort    - stop admitting new work once the current window drains
on_failure = {}
; Timeout in seconds for a single tile request (default: 30)
timeout = {}
; Completions between progress log lines (default: 50)
progress_interval = {}

[cache]
; Directory holding already-fetched tiles as <directory>/<zoom>/<x>/<y>.<extension>
; Tiles found here are skipped without a request
directory = {}
; File extension of cached tiles (default: pbf)
extension = {}

[logging]
; Log file path (default: ~/.tilewarm/tilewarm.log)
file = {}
"#,
        seeds,
        config.warm.max_zoom,
        region,
        base_url,
        config.fetch.window_size,
        config.fetch.on_failure,
        config.fetch.timeout,
        config.fetch.progress_interval,
        path_to_string(&config.cache.directory),
        config.cache.extension,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
