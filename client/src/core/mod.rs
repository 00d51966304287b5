//! # Core Abstractions
//!
//! Error types and the transport trait everything else is built on.
//!
//! - **[`error`]**: [`ApiError`] (per request) and [`AppError`] (per process)
//! - **[`service`]**: [`ApiService`], the JSON transport used by queries and mutations
//!
//! ## Dependency Injection
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wallet_client::config::ClientConfig;
//! use wallet_client::core::ApiService;
//! use wallet_client::services::api::ApiClient;
//!
//! # fn main() -> wallet_client::core::Result<()> {
//! // In production: the reqwest-backed client
//! let api: Arc<dyn ApiService> = Arc::new(ApiClient::new(&ClientConfig::default())?);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod service;

pub use error::{ApiError, AppError, Result};
pub use service::ApiService;
