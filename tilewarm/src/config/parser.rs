//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::defaults::clamp_window_size;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{SeedPoint, MAX_ZOOM};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [warm] section
    if let Some(section) = ini.section(Some("warm")) {
        if let Some(v) = section.get("seeds") {
            config.warm.seeds = parse_seed_list(v).map_err(|reason| {
                ConfigFileError::InvalidValue {
                    section: "warm".to_string(),
                    key: "seeds".to_string(),
                    value: v.to_string(),
                    reason,
                }
            })?;
        }
        if let Some(v) = section.get("max_zoom") {
            let parsed: u8 = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "warm".to_string(),
                key: "max_zoom".to_string(),
                value: v.to_string(),
                reason: format!("must be an integer between 0 and {}", MAX_ZOOM),
            })?;
            if parsed > MAX_ZOOM {
                return Err(ConfigFileError::InvalidValue {
                    section: "warm".to_string(),
                    key: "max_zoom".to_string(),
                    value: v.to_string(),
                    reason: format!("must be an integer between 0 and {}", MAX_ZOOM),
                });
            }
            config.warm.max_zoom = parsed;
        }
        if let Some(v) = section.get("region") {
            let v = v.trim();
            if !v.is_empty() {
                config.warm.region = Some(expand_tilde(v));
            }
        }
    }

    // [fetch] section
    if let Some(section) = ini.section(Some("fetch")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                config.fetch.base_url = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("window_size") {
            let parsed: usize = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "fetch".to_string(),
                key: "window_size".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer".to_string(),
            })?;
            // Enforce hard limits so one run cannot flood the service
            config.fetch.window_size = clamp_window_size(parsed);
        }
        if let Some(v) = section.get("on_failure") {
            config.fetch.on_failure =
                v.parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "fetch".to_string(),
                    key: "on_failure".to_string(),
                    value: v.to_string(),
                    reason: "must be 'continue' or 'abort'".to_string(),
                })?;
        }
        if let Some(v) = section.get("timeout") {
            config.fetch.timeout = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "fetch".to_string(),
                key: "timeout".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer (seconds)".to_string(),
            })?;
        }
        if let Some(v) = section.get("progress_interval") {
            config.fetch.progress_interval =
                v.parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "fetch".to_string(),
                    key: "progress_interval".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("extension") {
            let v = v.trim().trim_start_matches('.');
            if !v.is_empty() {
                config.cache.extension = v.to_string();
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse a semicolon-separated list of `lat,lon,zoom` seed points.
///
/// Empty entries (trailing semicolons, doubled separators) are skipped.
pub(super) fn parse_seed_list(value: &str) -> Result<Vec<SeedPoint>, String> {
    let mut seeds = Vec::new();
    for entry in value.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let seed: SeedPoint = entry
            .parse()
            .map_err(|_| format!("'{}' is not a lat,lon,zoom triple", entry))?;
        seeds.push(seed);
    }
    Ok(seeds)
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FailurePolicy, MAX_WINDOW_SIZE};
    use tempfile::TempDir;

    fn write_and_load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_full_config_overlays_every_section() {
        let config = write_and_load(
            r#"
[warm]
seeds = 37.7749,-122.4194,7; 40.7128,-74.0060,8
max_zoom = 10
region = /srv/regions/bay-area.json

[fetch]
base_url = https://tiles.example.net/v1
window_size = 64
on_failure = abort
timeout = 5
progress_interval = 10

[cache]
directory = /var/cache/tiles
extension = mvt

[logging]
file = /var/log/tilewarm.log
"#,
        )
        .unwrap();

        assert_eq!(config.warm.seeds.len(), 2);
        assert_eq!(config.warm.seeds[0], SeedPoint::new(37.7749, -122.4194, 7));
        assert_eq!(config.warm.max_zoom, 10);
        assert_eq!(
            config.warm.region,
            Some(PathBuf::from("/srv/regions/bay-area.json"))
        );

        assert_eq!(
            config.fetch.base_url.as_deref(),
            Some("https://tiles.example.net/v1")
        );
        assert_eq!(config.fetch.window_size, 64);
        assert_eq!(config.fetch.on_failure, FailurePolicy::Abort);
        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.progress_interval, 10);

        assert_eq!(config.cache.directory, PathBuf::from("/var/cache/tiles"));
        assert_eq!(config.cache.extension, "mvt");

        assert_eq!(config.logging.file, PathBuf::from("/var/log/tilewarm.log"));
    }

    #[test]
    fn test_partial_config_keeps_defaults_elsewhere() {
        let config = write_and_load("[fetch]\nwindow_size = 32\n").unwrap();
        let default = ConfigFile::default();

        assert_eq!(config.fetch.window_size, 32);
        assert_eq!(config.fetch.timeout, default.fetch.timeout);
        assert_eq!(config.warm.max_zoom, default.warm.max_zoom);
        assert_eq!(config.cache.extension, default.cache.extension);
        assert!(config.warm.seeds.is_empty());
    }

    #[test]
    fn test_malformed_seed_is_rejected() {
        let result = write_and_load("[warm]\nseeds = 37.7,-122.4\n");

        match result {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "warm");
                assert_eq!(key, "seeds");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_failure_policy_is_rejected() {
        let result = write_and_load("[fetch]\non_failure = retry\n");
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_max_zoom_past_scheme_limit_is_rejected() {
        let result = write_and_load("[warm]\nmax_zoom = 19\n");
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_window_size_is_clamped_not_rejected() {
        let config = write_and_load("[fetch]\nwindow_size = 100000\n").unwrap();
        assert_eq!(config.fetch.window_size, MAX_WINDOW_SIZE);

        let config = write_and_load("[fetch]\nwindow_size = 0\n").unwrap();
        assert_eq!(config.fetch.window_size, 1);
    }

    #[test]
    fn test_seed_list_skips_empty_entries() {
        let seeds = parse_seed_list("37.7,-122.4,7; ; 40.7,-74.0,8;").unwrap();
        assert_eq!(seeds.len(), 2);
    }

    #[test]
    fn test_extension_leading_dot_is_stripped() {
        let config = write_and_load("[cache]\nextension = .png\n").unwrap();
        assert_eq!(config.cache.extension, "png");
    }

    #[test]
    fn test_plain_paths_pass_through_tilde_expansion() {
        assert_eq!(
            expand_tilde("/var/cache/tiles"),
            PathBuf::from("/var/cache/tiles")
        );
    }
}
