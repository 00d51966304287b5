//! # API Client
//!
//! The request wrapper every API call goes through.
//!
//! Every request:
//! - carries credentials (the session cookie, kept in the client's cookie store)
//! - sends `Content-Type: application/json`
//! - has its status checked before the response is handed back
//!
//! | status | result |
//! |---|---|
//! | 2xx | `Ok(response)`, caller decodes |
//! | 401 | [`ApiError::Unauthorized`] |
//! | 403 | [`ApiError::Forbidden`] |
//! | other | [`ApiError::RequestFailed`] with the body's `message`, or `"Unknown error"` |
//!
//! Nothing is retried here; the query layer owns retries.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::ErrorResponse;

use crate::config::ClientConfig;
use crate::core::{ApiError, ApiService, AppError};

const UNKNOWN_ERROR: &str = "Unknown error";

/// HTTP client for the wallet API server.
///
/// Cheap to clone; clones share the connection pool and the cookie store, so a
/// login through one clone authenticates all of them.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create an API client for `config.base_url`.
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL relative request paths are joined to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `/api/...` against the base URL; absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Issue a request and check its status.
    ///
    /// `body` is serialized to JSON unless the method is a pure read
    /// (`GET`/`HEAD`), in which case it is dropped.
    #[tracing::instrument(skip(self, body), fields(method = %method, url = %url))]
    pub async fn request<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let start = Instant::now();
        let is_read = method == Method::GET || method == Method::HEAD;

        let mut builder = self.client.request(method, self.resolve(url));
        if let Some(body) = body.filter(|_| !is_read) {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request network error");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Response received"
        );

        check_status(response).await
    }

    /// `GET url` through [`request`](Self::request).
    pub async fn get(&self, url: &str) -> Result<Response, ApiError> {
        self.request::<()>(Method::GET, url, None).await
    }

    /// [`request`](Self::request) and decode the body into `T`.
    pub async fn request_json<T, B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, url, body).await?;
        let value = decode_json(response).await?;
        serde_json::from_value(value).map_err(ApiError::from)
    }
}

/// Map a non-success response to the matching [`ApiError`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Error bodies are optional and may not be JSON at all
    let server_message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty());

    let error = match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized {
            message: server_message.unwrap_or_else(|| "Unauthorized".to_string()),
        },
        StatusCode::FORBIDDEN => ApiError::Forbidden {
            message: server_message.unwrap_or_else(|| "Forbidden".to_string()),
        },
        other => ApiError::RequestFailed {
            status: other.as_u16(),
            message: server_message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        },
    };

    tracing::warn!(status = status.as_u16(), error = %error, "Request failed");
    Err(error)
}

/// Decode a success body as JSON. An empty body is `Value::Null`.
pub async fn decode_json(response: Response) -> Result<Value, ApiError> {
    let bytes = response.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(ApiError::from)
}

#[async_trait]
impl ApiService for ApiClient {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self.get(url).await?;
        decode_json(response).await
    }

    async fn send_json(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let response = self.request(method, url, body.as_ref()).await?;
        decode_json(response).await
    }
}
