//! # Backend API Client Module
//!
//! HTTP transport plus the endpoint functions built on it.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports and documentation
//! ├── client.rs   - ApiClient, the credentialed request wrapper
//! ├── auth.rs     - AuthService (session user, login, register, logout)
//! ├── wallet.rs   - Wallet and admin user list queries
//! ├── transactions.rs - History query, transfer and mint mutations
//! └── system.rs   - Health check
//! ```

pub mod auth;
pub mod client;
pub mod system;
pub mod transactions;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::{AuthService, USER_QUERY_KEY};
pub use client::{decode_json, ApiClient};
pub use system::health;
pub use transactions::{fetch_transactions, mint, transfer};
pub use wallet::{fetch_wallet, list_users};
