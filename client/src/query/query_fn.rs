//! Auth-aware query functions.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use super::key::QueryKey;
use crate::core::{ApiError, ApiService};

/// What a query function does with a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum On401 {
    /// Propagate [`ApiError::Unauthorized`] unchanged.
    #[default]
    Throw,
    /// Resolve to `null`, for views that render a logged-out state.
    ReturnNull,
}

/// Build a fetcher for [`QueryClient::query`](super::QueryClient::query).
///
/// The fetcher issues `GET key[0]` through `api` and decodes the JSON body.
/// Only `Unauthorized` is affected by `on401`; every other error passes
/// through unchanged.
pub fn make_query_fn(
    api: Arc<dyn ApiService>,
    on401: On401,
) -> impl Fn(QueryKey) -> BoxFuture<'static, Result<Value, ApiError>> + Clone + Send + Sync + 'static {
    move |key: QueryKey| {
        let api = api.clone();
        async move {
            let Some(url) = key.url() else {
                return Err(ApiError::InvalidKey);
            };
            match api.get_json(url).await {
                Err(ApiError::Unauthorized { .. }) if on401 == On401::ReturnNull => {
                    tracing::debug!(key = %key, "Unauthenticated, resolving to null");
                    Ok(Value::Null)
                }
                other => other,
            }
        }
        .boxed()
    }
}
