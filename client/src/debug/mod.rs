//! # Logging
//!
//! File-based structured logging for the wallet client.
//!
//! ## Usage
//!
//! ```rust,no_run
//! // Initialize at startup and hold the guard until exit
//! let _log_guard = wallet_client::debug::init();
//!
//! tracing::info!(endpoint = "/api/wallet", duration_ms = 42, "Query completed");
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log filter (default `wallet_client=info,warn`)
//! - `CLIENT_LOG_DIR`: Log directory (default `logs`)
//! - `CLIENT_LOG_CONSOLE`: Set to `1` to mirror logs to stderr

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init;
