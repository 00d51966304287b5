//! # Error Handling
//!
//! [`AppError`] is returned by every handler. It renders as the JSON body the
//! client's request wrapper expects:
//!
//! ```text
//! HTTP/1.1 409 Conflict
//! {"message":"Username already exists"}
//! ```
//!
//! | variant | status |
//! |---|---|
//! | [`InvalidInput`](AppError::InvalidInput) | 400 |
//! | [`Unauthorized`](AppError::Unauthorized) | 401 |
//! | [`Forbidden`](AppError::Forbidden) | 403 |
//! | [`NotFound`](AppError::NotFound) | 404 |
//! | [`Conflict`](AppError::Conflict) | 409 |
//! | [`Internal`](AppError::Internal) | 500, message hidden from the client |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lib_auth::PwdError;
use shared::ErrorResponse;
use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_authenticated() -> Self {
        AppError::Unauthorized("Not authenticated".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to the client.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Client error: {}", self);
        }

        (status, Json(ErrorResponse::new(self.user_message()))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Rejected(msg) => AppError::InvalidInput(msg),
            StoreError::Unavailable(msg) => AppError::Internal(msg),
        }
    }
}

impl From<PwdError> for AppError {
    fn from(err: PwdError) -> Self {
        match err {
            PwdError::TooShort => AppError::InvalidInput(err.to_string()),
            PwdError::Hash(_) | PwdError::MalformedHash(_) => AppError::Internal(err.to_string()),
        }
    }
}
