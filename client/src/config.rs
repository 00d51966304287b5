//! # Client Configuration
//!
//! Loaded from environment variables (a `.env` file is honoured by the binary)
//! and validated on startup to fail fast.
//!
//! | variable | default |
//! |---|---|
//! | `API_BASE_URL` | `http://127.0.0.1:5000` |
//! | `API_TIMEOUT_SECS` | `10` |
//! | `QUERY_STALE_SECS` | `300` |
//! | `QUERY_RETRY_ATTEMPTS` | `3` |
//! | `TOAST_LIMIT` | `5` |

use std::time::Duration;

use lib_utils::{get_env_or, get_env_parse_or};

use crate::core::Result;
use crate::core::AppError;
use crate::notifications::DEFAULT_TOAST_LIMIT;
use crate::query::{QueryConfig, RetryPolicy};

/// Base URL for the API server.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Wallet client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for relative request URLs (`/api/...`)
    pub base_url: String,
    /// Per-request transport timeout
    pub timeout: Duration,
    /// How long a cached query counts as fresh
    pub stale_time: Duration,
    /// Attempts per query or mutation before the error is surfaced
    pub retry_attempts: u32,
    /// Visible toasts at once
    pub toast_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            stale_time: Duration::from_secs(5 * 60),
            retry_attempts: 3,
            toast_limit: DEFAULT_TOAST_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            base_url: get_env_or("API_BASE_URL", &defaults.base_url),
            timeout: Duration::from_secs(get_env_parse_or("API_TIMEOUT_SECS", defaults.timeout.as_secs())?),
            stale_time: Duration::from_secs(get_env_parse_or(
                "QUERY_STALE_SECS",
                defaults.stale_time.as_secs(),
            )?),
            retry_attempts: get_env_parse_or("QUERY_RETRY_ATTEMPTS", defaults.retry_attempts)?,
            toast_limit: get_env_parse_or("TOAST_LIMIT", defaults.toast_limit)?,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "API_BASE_URL must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(AppError::Config("API_TIMEOUT_SECS must be greater than 0".to_string()));
        }

        if self.retry_attempts == 0 {
            return Err(AppError::Config("QUERY_RETRY_ATTEMPTS must be at least 1".to_string()));
        }

        if self.toast_limit == 0 {
            return Err(AppError::Config("TOAST_LIMIT must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Query cache policy derived from this configuration.
    ///
    /// Queries and mutations get separate but identical retry policies.
    pub fn query_config(&self) -> QueryConfig {
        let retry = RetryPolicy {
            max_attempts: self.retry_attempts,
            ..RetryPolicy::default()
        };

        QueryConfig {
            stale_time: self.stale_time,
            query_retry: retry,
            mutation_retry: retry,
            ..QueryConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());

        let query = config.query_config();
        assert_eq!(query.stale_time, Duration::from_secs(300));
        assert!(!query.refetch_on_window_focus);
        assert_eq!(query.query_retry.max_attempts, 3);
        assert_eq!(query.mutation_retry.max_attempts, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig {
            base_url: "localhost:5000".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = ClientConfig {
            retry_attempts: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
