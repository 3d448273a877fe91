//! Configuration management for the sync runner.

use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the local snapshot dump
    pub source_path: PathBuf,
    /// Remote table store base URL
    pub remote_url: String,
    /// Remote table store API key
    pub remote_key: String,
    /// Date floor for tables that filter old rows
    pub since: NaiveDate,
    /// Bound on each remote operation; expiry fails the operation, no retry
    pub remote_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source_path = env::var("SOURCE_PATH")
            .map_err(|_| ConfigError::MissingSourcePath)?
            .into();

        let remote_url = env::var("REMOTE_URL").map_err(|_| ConfigError::MissingRemoteUrl)?;
        let remote_key = env::var("REMOTE_KEY").map_err(|_| ConfigError::MissingRemoteKey)?;

        let since = match env::var("SYNC_SINCE") {
            Ok(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidSince(raw))?,
            // The legacy ledger is synced from 2020 onward by default.
            Err(_) => NaiveDate::from_ymd_opt(2020, 1, 1)
                .ok_or_else(|| ConfigError::InvalidSince("2020-01-01".to_string()))?,
        };

        let remote_timeout = match env::var("REMOTE_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            source_path,
            remote_url,
            remote_key,
            since,
            remote_timeout,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SOURCE_PATH environment variable is required")]
    MissingSourcePath,

    #[error("REMOTE_URL environment variable is required")]
    MissingRemoteUrl,

    #[error("REMOTE_KEY environment variable is required")]
    MissingRemoteKey,

    #[error("Invalid SYNC_SINCE value '{0}', expected YYYY-MM-DD")]
    InvalidSince(String),

    #[error("Invalid REMOTE_TIMEOUT_SECS value '{0}'")]
    InvalidTimeout(String),
}
