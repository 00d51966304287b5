//! Logging configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "wallet_client=info,warn";
pub const LOG_FILE_NAME: &str = "client.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory for the daily-rotated log file
    pub log_dir: PathBuf,
    /// `EnvFilter` directives (e.g., "wallet_client=debug,info")
    pub log_level: String,
    /// Mirror log lines to stderr
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_level: DEFAULT_LOG_FILTER.to_string(),
            console: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            log_dir: std::env::var("CLIENT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            console: std::env::var("CLIENT_LOG_CONSOLE")
                .map(|v| v == "1")
                .unwrap_or(defaults.console),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }
}
