//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization to reduce
//! duplication across command handlers.

use crate::error::CliError;
use tilewarm::config::ConfigFile;
use tilewarm::logging::{init_logging_full, LoggingGuard};
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional console logging.
    ///
    /// Commands that print machine-readable output (JSON) disable the
    /// console layer so log lines cannot corrupt stdout; logs still go
    /// to the log file.
    pub fn with_console(stdout_logging: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let logging_guard = init_logging_full(&config.logging.file, stdout_logging)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Tilewarm v{}", tilewarm::VERSION);
        info!("Tilewarm CLI: {} command", command);
    }
}
