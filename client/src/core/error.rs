//! # Common Error Types
//!
//! Error handling for the wallet client.
//!
//! ## Error Categories
//!
//! - [`ApiError`]: everything that can go wrong on one HTTP request. It carries
//!   the HTTP status as a field, so retry decisions and UI branching never
//!   inspect message text.
//! - [`AppError`]: startup and wiring failures of the client process
//!   (configuration, HTTP client construction) plus API errors bubbling up to
//!   the binary.
//!
//! ## Display Format
//!
//! HTTP failures render as `"<status>: <message>"`, the format the UI shows to
//! users:
//!
//! ```rust
//! use wallet_client::core::error::ApiError;
//!
//! let err = ApiError::Forbidden { message: "no access".to_string() };
//! assert_eq!(err.to_string(), "403: no access");
//! assert_eq!(err.status(), Some(403));
//! assert!(err.is_auth_failure());
//! ```

use thiserror::Error;

/// Failure of a single API request.
///
/// `Clone` so one failure can be handed to every caller coalesced onto the
/// same in-flight query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401. Never retried.
    #[error("401: {message}")]
    Unauthorized { message: String },

    /// HTTP 403. Never retried.
    #[error("403: {message}")]
    Forbidden { message: String },

    /// Any other non-success status, with the server's message when it sent one.
    #[error("{status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// Transport failure: no response was received (DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A success response whose body could not be decoded into the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// A query key without a URL element.
    #[error("Query key is empty")]
    InvalidKey,
}

impl ApiError {
    /// HTTP status of the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::RequestFailed { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::InvalidKey => None,
        }
    }

    /// `true` for 401 and 403. Retrying these cannot succeed.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::Forbidden { .. })
    }

    /// Human message without the status prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::RequestFailed { message, .. } => message,
            ApiError::Network(message) | ApiError::Decode(message) => message,
            ApiError::InvalidKey => "Query key is empty",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Client process error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
