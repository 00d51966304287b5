//! External services. Currently only the wallet backend API.

pub mod api;
