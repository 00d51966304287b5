//! # Authentication Library
//!
//! Password hashing and login session records.

pub mod pwd;
pub mod session;

// Re-export commonly used types
pub use pwd::{hash_password, verify_password, PwdError};
pub use session::Session;
