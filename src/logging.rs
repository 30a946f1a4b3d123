//! File-based tracing setup.
//!
//! The terminal UI owns stdout, so diagnostics go to
//! `<log_dir>/task-prioritizer.log` and never to the screen.
//! A failed setup is reported to the caller and the client keeps running
//! without a subscriber.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "task-prioritizer.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("log directory must not be empty")]
    EmptyLogDir,

    #[error("failed to open log file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialised,
}

/// Default filter for the current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Parse a filter directive such as `info` or `task_prioritizer=debug,warn`.
pub fn parse_filter(filter: &str) -> Result<EnvFilter, LoggingError> {
    let trimmed = filter.trim();
    let directive = if trimmed.is_empty() {
        default_log_level()
    } else {
        trimmed
    };
    EnvFilter::try_new(directive).map_err(|err| LoggingError::InvalidFilter {
        filter: filter.to_string(),
        reason: err.to_string(),
    })
}

/// Install the global subscriber writing to a log file in `log_dir`.
pub fn init_logging(filter: &str, log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() {
        return Err(LoggingError::EmptyLogDir);
    }
    let env_filter = parse_filter(filter)?;

    fs::create_dir_all(log_dir).map_err(|source| LoggingError::Io {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::Io {
            path: path.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialised)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        log_file = %path.display(),
        "logging initialised"
    );
    Ok(path)
}
