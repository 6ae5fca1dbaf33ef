//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilewarm::config::ConfigFileError;
use tilewarm::fetch::FetchError;
use tilewarm::region::RegionError;
use tilewarm::warmer::WarmError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to load the region boundary file
    Region(RegionError),
    /// Failed to create the tile fetcher
    Fetcher(FetchError),
    /// Warm run failed
    Warm(WarmError),
    /// Failed to encode JSON output
    Json(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Warm(WarmError::Aborted { summary }) => {
                eprintln!();
                eprintln!(
                    "{} of {} attempted tile(s) failed before the run stopped.",
                    summary.failed, summary.attempted
                );
                eprintln!("Use --on-failure continue to keep going past failed tiles.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'tilewarm init' to create a config file, or");
                eprintln!("'tilewarm config list' to see the current settings.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Region(e) => write!(f, "Failed to load region file: {}", e),
            CliError::Fetcher(e) => write!(f, "Failed to create tile fetcher: {}", e),
            CliError::Warm(e) => write!(f, "Warm run failed: {}", e),
            CliError::Json(e) => write!(f, "Failed to encode JSON output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Region(e) => Some(e),
            CliError::Fetcher(e) => Some(e),
            CliError::Warm(e) => Some(e),
            CliError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<WarmError> for CliError {
    fn from(e: WarmError) -> Self {
        CliError::Warm(e)
    }
}

impl From<RegionError> for CliError {
    fn from(e: RegionError) -> Self {
        CliError::Region(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}
