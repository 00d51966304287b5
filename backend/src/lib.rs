//! # Paisa Wallet API
//!
//! Thin session-auth server the wallet client talks to.
//!
//! ## Module Structure
//!
//! - **config**: [`ServerConfig`] from environment variables
//! - **error**: [`AppError`](error::AppError), rendered as `{"message": ...}`
//! - **store**: [`UserStore`](store::UserStore) seam and the in-memory implementation
//! - **middleware**: session extractors, request stamping, request logging
//! - **handlers**: health, auth, wallet and admin endpoints
//! - **server**: router assembly and startup

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod store;

pub use config::ServerConfig;
pub use server::{create_router, start_server, AppState};
