//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged between the wallet client and the API server.
//!
//! ## Module Organization
//!
//! - [`auth`] - Register, login, and the session user
//! - [`wallet`] - Wallet balance
//! - [`transaction`] - Transfers, mints and the transaction history
//! - [`system`] - Health check and generic messages
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/login
//! Content-Type: application/json
//!
//! {
//!   "username": "sita",
//!   "password": "MyPassword123!"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//! Set-Cookie: sid=4f8a...; HttpOnly; Path=/; SameSite=Lax
//!
//! {
//!   "id": 1,
//!   "username": "sita",
//!   "email": "sita@example.com",
//!   "role": "user",
//!   "wallet_address": ""
//! }
//! ```

pub mod auth;
pub mod system;
pub mod transaction;
pub mod wallet;

pub use auth::*;
pub use system::*;
pub use transaction::*;
pub use wallet::*;
