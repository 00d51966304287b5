//! # Request Stamping Middleware
//!
//! Generates a request ID, stores it in request extensions as
//! [`RequestStamp`] and echoes it in the `X-Request-ID` response header.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::SystemTime;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    pub id: String,
    pub timestamp: SystemTime,
}

impl RequestStamp {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: SystemTime::now(),
        }
    }
}

pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::new();
    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}
