//! # Service Traits
//!
//! The transport seam between the query layer and the network. Query
//! functions, mutations and the auth service depend on [`ApiService`], so
//! tests swap in an in-memory implementation instead of a server.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::error::ApiError;

/// JSON-over-HTTP transport.
///
/// Implementations must apply the request contract of
/// [`ApiClient::request`](crate::services::api::ApiClient::request):
/// credentials on every call, and 401/403/other failures mapped to the
/// matching [`ApiError`] variant.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// `GET url` and decode the JSON body. An empty body decodes to `Value::Null`.
    async fn get_json(&self, url: &str) -> Result<Value, ApiError>;

    /// Send `body` with `method` and decode the JSON response.
    async fn send_json(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, ApiError>;
}
