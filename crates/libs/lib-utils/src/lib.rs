//! # Utilities Library
//!
//! Environment variable access and input validation shared by the client and the server.

pub mod envs;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use validation::{validate_email, validate_min_length, validate_required};
