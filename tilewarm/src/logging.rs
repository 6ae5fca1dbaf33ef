//! Logging infrastructure for tilewarm.
//!
//! Provides structured logging with file output and console output:
//! - Writes to the configured log file (cleared on session start)
//! - Also prints to stdout for CLI tailing
//! - Local-time RFC 3339 timestamps
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file,
/// and sets up dual output to both file and stdout.
///
/// # Arguments
///
/// * `log_path` - Full path of the log file (e.g., `~/.tilewarm/tilewarm.log`)
///
/// # Returns
///
/// LoggingGuard that must be kept alive for logging to work
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared
pub fn init_logging(log_path: &Path) -> Result<LoggingGuard, io::Error> {
    init_logging_full(log_path, true)
}

/// Initialize logging with control over console output.
///
/// Disable `stdout_enabled` when stdout must stay machine-readable,
/// such as JSON output modes; the file layer stays active either way.
pub fn init_logging_full(log_path: &Path, stdout_enabled: bool) -> Result<LoggingGuard, io::Error> {
    let (log_dir, log_file) = prepare_log_file(log_path)?;

    // Create file appender with non-blocking writer
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    // Local timestamps when the offset is known, UTC otherwise
    let timer =
        OffsetTime::local_rfc_3339().unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));

    // File layer without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_timer(timer.clone());

    // Stdout layer with ANSI colors for terminal
    let stdout_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_timer(timer)
    });

    // Create env filter (defaults to INFO if RUST_LOG not set)
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Initialize global subscriber with both layers
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Creates the log file's directory, truncates any previous contents,
/// and splits the path into the (dir, file name) pair the appender wants.
fn prepare_log_file(log_path: &Path) -> Result<(std::path::PathBuf, String), io::Error> {
    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let log_file = log_path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?
        .to_string_lossy()
        .into_owned();

    fs::create_dir_all(&log_dir)?;

    // Clear previous log file by writing empty content.
    // This handles both existing and non-existing files.
    fs::write(log_path, "")?;

    Ok((log_dir, log_file))
}
