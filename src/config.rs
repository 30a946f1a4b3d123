//! Start-up configuration.
//!
//! Values come from command line flags, which fall back to environment
//! variables (handled by clap) and then to the defaults below.

use std::path::PathBuf;

use reqwest::Url;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::fields::Strategy;
use crate::logging::default_log_level;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub strategy: String,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let server_url = cli
            .server
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        validate_server_url(&server_url)?;

        Ok(Config {
            server_url,
            strategy: cli
                .strategy
                .clone()
                .unwrap_or_else(|| Strategy::default().as_str().to_string()),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: cli.log_dir.clone().unwrap_or_else(default_log_dir),
        })
    }
}

/// `~/.task-prioritizer/logs`, or `./.task-prioritizer/logs` without a home directory.
pub fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".task-prioritizer").join("logs")
}

/// The service URL must be an absolute http(s) URL with a host.
pub fn validate_server_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidServerUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidServerUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["tp", "--log-dir", "/tmp/tp-logs"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.strategy, "smart");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/tp-logs"));
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "tp",
            "--server",
            "https://tasks.example.com",
            "--strategy",
            "impact",
            "--log-level",
            "warn",
            "suggest",
        ]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.server_url, "https://tasks.example.com");
        assert_eq!(config.strategy, "impact");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_server_url_validation() {
        assert!(validate_server_url("http://127.0.0.1:8000").is_ok());
        assert!(validate_server_url("https://example.com/base/").is_ok());
        assert!(matches!(
            validate_server_url("not a url"),
            Err(ConfigError::InvalidServerUrl { .. })
        ));
        assert!(matches!(
            validate_server_url("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }
}
