//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the wallet client and the API server.
//! All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Session authentication and user DTOs
//!   - **[`dto::wallet`]**: Wallet balance DTOs
//!   - **[`dto::transaction`]**: Transfer, mint and history DTOs
//!   - **[`dto::system`]**: Health and generic message DTOs
//! - **[`utils`]**: Shared display helpers
//!
//! ## Wire Format
//!
//! - Field names are **snake_case** in both Rust and JSON
//! - Roles serialize to lowercase strings (`"user"`, `"admin"`, `"superadmin"`)
//! - Error bodies are `{ "message": "..." }`; the client treats the field as optional
//!
//! ## Usage in the Client
//!
//! ```rust,ignore
//! use shared::dto::auth::{LoginRequest, UserInfo};
//!
//! let request = LoginRequest {
//!     username: "sita".to_string(),
//!     password: "secret-password".to_string(),
//! };
//!
//! # async fn run(request: LoginRequest) -> Result<(), reqwest::Error> {
//! let user: UserInfo = reqwest::Client::new()
//!     .post("http://127.0.0.1:5000/api/login")
//!     .json(&request)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod dto;
pub mod utils;

// Wildcard re-exports: every DTO is public API
pub use dto::*;
pub use utils::*;
