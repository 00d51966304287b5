//! # Middleware
//!
//! ## Modules
//!
//! - **[`mw_auth`]**: Session cookie extractors (`CurrentUser`, `AdminUser`, `SuperadminUser`)
//! - **[`mw_req_stamp`]**: Request ID stamping
//! - **[`mw_logging`]**: Request/response logging

pub mod mw_auth;
pub mod mw_logging;
pub mod mw_req_stamp;

pub use mw_auth::{AdminUser, CurrentUser, SuperadminUser};
pub use mw_logging::log_requests;
pub use mw_req_stamp::{stamp_req, RequestStamp};
