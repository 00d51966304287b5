//! # Paisa Wallet Client - Library Root
//!
//! Data layer for the wallet front end: a credentialed HTTP wrapper, a
//! process-wide query cache with retries and request coalescing, toast
//! notifications and page admission by role.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              wallet-client (this crate)                │
//! ├────────────────────────────────────────────────────────┤
//! │  QueryClient   - Cache, coalescing, retry policy       │
//! │  ApiClient     - Reqwest with cookie store             │
//! │  ToastStore    - Timed notifications                   │
//! │  RouteGuard    - Loading / redirect / render           │
//! └────────────────────────────────────────────────────────┘
//!          │
//!          │ HTTP (JSON, session cookie)
//!          ▼
//! ┌─────────────────┐
//! │  Backend API    │
//! │  (Axum server)  │
//! └─────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **config**: [`ClientConfig`](config::ClientConfig) from environment variables
//! - **core**: Error types and the [`ApiService`](core::ApiService) transport trait
//! - **debug**: File-based tracing setup
//! - **notifications**: [`ToastStore`](notifications::ToastStore)
//! - **query**: [`QueryClient`](query::QueryClient), retry policy, auth-aware query functions
//! - **routing**: [`RouteGuard`](routing::RouteGuard)
//! - **services**: `api` - transport and endpoint functions
//!
//! ### Module Dependency Graph
//!
//! ```text
//! services::api::auth ──► query ──► core
//!        │                  ▲
//!        ▼                  │
//!     routing     services::api::client
//! notifications ──► core
//! ```
//!
//! ## Error Handling
//!
//! Requests fail with [`ApiError`](core::ApiError), which carries the HTTP
//! status. Startup failures (bad configuration, client construction) are
//! [`AppError`](core::AppError).

pub mod config;
pub mod core;
pub mod debug;
pub mod notifications;
pub mod query;
pub mod routing;
pub mod services;

pub use config::ClientConfig;
pub use core::{ApiError, AppError};
pub use notifications::ToastStore;
pub use query::QueryClient;
pub use routing::RouteGuard;
pub use services::api::{ApiClient, AuthService};
