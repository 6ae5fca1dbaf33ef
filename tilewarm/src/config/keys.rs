//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with per-key validation.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use super::defaults::clamp_window_size;
use super::parser::{expand_tilde, parse_seed_list};
use super::settings::ConfigFile;
use crate::coord::MAX_ZOOM;
use crate::fetch::FailurePolicy;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Warm settings
    WarmSeeds,
    WarmMaxZoom,
    WarmRegion,

    // Fetch settings
    FetchBaseUrl,
    FetchWindowSize,
    FetchOnFailure,
    FetchTimeout,
    FetchProgressInterval,

    // Cache settings
    CacheDirectory,
    CacheExtension,

    // Logging settings
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warm.seeds" => Ok(ConfigKey::WarmSeeds),
            "warm.max_zoom" => Ok(ConfigKey::WarmMaxZoom),
            "warm.region" => Ok(ConfigKey::WarmRegion),

            "fetch.base_url" => Ok(ConfigKey::FetchBaseUrl),
            "fetch.window_size" => Ok(ConfigKey::FetchWindowSize),
            "fetch.on_failure" => Ok(ConfigKey::FetchOnFailure),
            "fetch.timeout" => Ok(ConfigKey::FetchTimeout),
            "fetch.progress_interval" => Ok(ConfigKey::FetchProgressInterval),

            "cache.directory" => Ok(ConfigKey::CacheDirectory),
            "cache.extension" => Ok(ConfigKey::CacheExtension),

            "logging.file" => Ok(ConfigKey::LoggingFile),

            _ => Err(ConfigKeyError::UnknownKey(s.to_string())),
        }
    }
}

impl ConfigKey {
    /// All keys, in config file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::WarmSeeds,
            ConfigKey::WarmMaxZoom,
            ConfigKey::WarmRegion,
            ConfigKey::FetchBaseUrl,
            ConfigKey::FetchWindowSize,
            ConfigKey::FetchOnFailure,
            ConfigKey::FetchTimeout,
            ConfigKey::FetchProgressInterval,
            ConfigKey::CacheDirectory,
            ConfigKey::CacheExtension,
            ConfigKey::LoggingFile,
        ]
    }

    /// Get the canonical key name (e.g., "fetch.base_url").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::WarmSeeds => "warm.seeds",
            ConfigKey::WarmMaxZoom => "warm.max_zoom",
            ConfigKey::WarmRegion => "warm.region",
            ConfigKey::FetchBaseUrl => "fetch.base_url",
            ConfigKey::FetchWindowSize => "fetch.window_size",
            ConfigKey::FetchOnFailure => "fetch.on_failure",
            ConfigKey::FetchTimeout => "fetch.timeout",
            ConfigKey::FetchProgressInterval => "fetch.progress_interval",
            ConfigKey::CacheDirectory => "cache.directory",
            ConfigKey::CacheExtension => "cache.extension",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "fetch").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "base_url").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::WarmSeeds => config
                .warm
                .seeds
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join("; "),
            ConfigKey::WarmMaxZoom => config.warm.max_zoom.to_string(),
            ConfigKey::WarmRegion => config
                .warm
                .region
                .as_ref()
                .map(|p| path_to_display(p))
                .unwrap_or_default(),
            ConfigKey::FetchBaseUrl => config.fetch.base_url.clone().unwrap_or_default(),
            ConfigKey::FetchWindowSize => config.fetch.window_size.to_string(),
            ConfigKey::FetchOnFailure => config.fetch.on_failure.to_string(),
            ConfigKey::FetchTimeout => config.fetch.timeout.to_string(),
            ConfigKey::FetchProgressInterval => config.fetch.progress_interval.to_string(),
            ConfigKey::CacheDirectory => path_to_display(&config.cache.directory),
            ConfigKey::CacheExtension => config.cache.extension.clone(),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value before setting; the config is untouched on error.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        match self {
            ConfigKey::WarmSeeds => {
                config.warm.seeds = parse_seed_list(value).map_err(|reason| self.invalid(reason))?;
            }
            ConfigKey::WarmMaxZoom => {
                let zoom: u8 = value.parse().map_err(|_| {
                    self.invalid(format!("must be an integer between 0 and {}", MAX_ZOOM))
                })?;
                if zoom > MAX_ZOOM {
                    return Err(
                        self.invalid(format!("must be an integer between 0 and {}", MAX_ZOOM))
                    );
                }
                config.warm.max_zoom = zoom;
            }
            ConfigKey::WarmRegion => {
                config.warm.region = optional_path(value);
            }
            ConfigKey::FetchBaseUrl => {
                config.fetch.base_url = optional_string(value);
            }
            ConfigKey::FetchWindowSize => {
                let parsed: usize = value
                    .parse()
                    .map_err(|_| self.invalid("must be a positive integer".to_string()))?;
                config.fetch.window_size = clamp_window_size(parsed);
            }
            ConfigKey::FetchOnFailure => {
                config.fetch.on_failure = value
                    .parse::<FailurePolicy>()
                    .map_err(|_| self.invalid("must be 'continue' or 'abort'".to_string()))?;
            }
            ConfigKey::FetchTimeout => {
                config.fetch.timeout = value
                    .parse()
                    .map_err(|_| self.invalid("must be a positive integer (seconds)".to_string()))?;
            }
            ConfigKey::FetchProgressInterval => {
                config.fetch.progress_interval = value
                    .parse()
                    .map_err(|_| self.invalid("must be a positive integer".to_string()))?;
            }
            ConfigKey::CacheDirectory => {
                config.cache.directory = expand_tilde(value);
            }
            ConfigKey::CacheExtension => {
                let v = value.trim().trim_start_matches('.');
                if v.is_empty() {
                    return Err(self.invalid("must not be empty".to_string()));
                }
                config.cache.extension = v.to_string();
            }
            ConfigKey::LoggingFile => {
                config.logging.file = expand_tilde(value);
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> ConfigKeyError {
        ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        }
    }
}

/// Empty strings become None.
fn optional_string(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

/// Empty strings become None, others expand ~ and become paths.
fn optional_path(value: &str) -> Option<PathBuf> {
    let v = value.trim();
    if v.is_empty() {
        None
    } else {
        Some(expand_tilde(v))
    }
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
