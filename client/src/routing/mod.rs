//! Page admission by session and role.

pub mod guard;

pub use guard::{AuthState, GuardDecision, RouteGuard, HOME_PATH, LOGIN_PATH};
