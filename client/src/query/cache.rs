//! # Query Cache Client
//!
//! Process-wide cache of JSON query results keyed by [`QueryKey`].
//!
//! - A fresh hit (younger than `stale_time`, not invalidated) is served from
//!   memory without touching the fetcher.
//! - Concurrent misses on one key share a single in-flight fetch.
//! - Fetches and mutations run under their [`RetryPolicy`]; callers only see
//!   the final error.
//! - `invalidate`, `remove`, `clear` and `set_query_data` detach any fetch
//!   running for the keys they touch. A detached fetch still answers its own
//!   callers but never writes to the cache.
//!
//! The client is constructed once at startup and handed to consumers by
//! clone; clones share the same cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;

use super::key::QueryKey;
use super::retry::RetryPolicy;
use crate::core::ApiError;

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Value>, ApiError>>>;

/// Global cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// Age after which a cached value is refetched on next use
    pub stale_time: Duration,
    /// Mark everything stale when the window regains focus
    pub refetch_on_window_focus: bool,
    pub query_retry: RetryPolicy,
    pub mutation_retry: RetryPolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            refetch_on_window_focus: false,
            query_retry: RetryPolicy::default(),
            mutation_retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<Value>,
    updated_at: Instant,
    invalidated: bool,
}

impl CacheEntry {
    fn new(value: Arc<Value>) -> Self {
        Self {
            value,
            updated_at: Instant::now(),
            invalidated: false,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated && self.updated_at.elapsed() < stale_time
    }
}

struct InFlight {
    /// Identifies the fetch that owns the slot
    id: u64,
    fetch: SharedFetch,
}

// Lock order: `in_flight` before `entries`.
struct Inner {
    config: QueryConfig,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    in_flight: Mutex<HashMap<QueryKey, InFlight>>,
    next_fetch_id: AtomicU64,
}

/// Cached, coalescing, retrying front for query fetchers.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("config", &self.inner.config)
            .field("entries", &self.inner.entries.lock().len())
            .field("in_flight", &self.inner.in_flight.lock().len())
            .finish()
    }
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                entries: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                next_fetch_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.inner.config
    }

    /// Read `key`, fetching it when absent or stale.
    ///
    /// `fetcher` receives the key and is called at most once per attempt; the
    /// retry policy may call it again after a failure. Callers that arrive
    /// while a fetch for `key` is running await that fetch instead of calling
    /// their own fetcher.
    pub async fn query<F, Fut>(&self, key: impl Into<QueryKey>, fetcher: F) -> Result<Arc<Value>, ApiError>
    where
        F: Fn(QueryKey) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        let key = key.into();

        let fetch = {
            let mut in_flight = self.inner.in_flight.lock();

            // Checked under the in-flight lock so a fetch that just finished
            // is seen either as a fresh entry or as still in flight
            if let Some(value) = self.fresh_value(&key) {
                tracing::trace!(key = %key, "Query cache hit");
                return Ok(value);
            }

            match in_flight.get(&key) {
                Some(existing) => {
                    tracing::debug!(key = %key, "Joining in-flight query");
                    existing.fetch.clone()
                }
                None => {
                    tracing::debug!(key = %key, "Query cache miss, fetching");
                    let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let fetch = self
                        .clone()
                        .fetch_and_store(id, key.clone(), fetcher)
                        .boxed()
                        .shared();
                    in_flight.insert(key, InFlight { id, fetch: fetch.clone() });
                    fetch
                }
            }
        };

        fetch.await
    }

    /// [`query`](Self::query) decoded into `T`.
    pub async fn query_as<T, F, Fut>(&self, key: impl Into<QueryKey>, fetcher: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(QueryKey) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        let value = self.query(key, fetcher).await?;
        T::deserialize(value.as_ref()).map_err(ApiError::from)
    }

    /// Run a write. Nothing is cached.
    ///
    /// The caller invalidates whatever cached keys the write affects.
    pub async fn mutate<T, F, Fut>(&self, mutation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = self.inner.config.mutation_retry.run(mutation).await;
        if let Err(error) = &result {
            tracing::warn!(error = %error, "Mutation failed");
        }
        result
    }

    /// Cached value for `key` regardless of age.
    pub fn get_query_data(&self, key: impl Into<QueryKey>) -> Option<Arc<Value>> {
        let key = key.into();
        self.inner.entries.lock().get(&key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` as freshly fetched.
    ///
    /// A fetch already running for `key` no longer writes its result.
    pub fn set_query_data(&self, key: impl Into<QueryKey>, value: Value) {
        let key = key.into();
        tracing::debug!(key = %key, "Query data set");

        let mut in_flight = self.inner.in_flight.lock();
        in_flight.remove(&key);
        self.inner.entries.lock().insert(key, CacheEntry::new(Arc::new(value)));
    }

    /// Mark every entry under `prefix` stale. Returns how many were marked.
    ///
    /// Fetches running under `prefix` are detached, so the next query
    /// starts a new request instead of joining one that began before the
    /// invalidation.
    pub fn invalidate(&self, prefix: impl Into<QueryKey>) -> usize {
        let prefix = prefix.into();

        let mut in_flight = self.inner.in_flight.lock();
        let detached = detach(&mut in_flight, &prefix);

        let mut marked = 0;
        for (_, entry) in self
            .inner
            .entries
            .lock()
            .iter_mut()
            .filter(|(key, _)| key.starts_with(&prefix))
        {
            entry.invalidated = true;
            marked += 1;
        }
        tracing::debug!(prefix = %prefix, marked, detached, "Queries invalidated");
        marked
    }

    /// Drop every entry under `prefix`. Returns how many were dropped.
    pub fn remove(&self, prefix: impl Into<QueryKey>) -> usize {
        let prefix = prefix.into();

        let mut in_flight = self.inner.in_flight.lock();
        detach(&mut in_flight, &prefix);

        let mut entries = self.inner.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&prefix));
        before - entries.len()
    }

    /// Drop every cached entry and detach every running fetch.
    pub fn clear(&self) {
        let mut in_flight = self.inner.in_flight.lock();
        in_flight.clear();
        self.inner.entries.lock().clear();
    }

    /// `true` while a fetch for `key` is running.
    pub fn is_fetching(&self, key: impl Into<QueryKey>) -> bool {
        let key = key.into();
        self.inner.in_flight.lock().contains_key(&key)
    }

    /// Window focus hook. No-op unless `refetch_on_window_focus` is set.
    pub fn on_window_focus(&self) {
        if self.inner.config.refetch_on_window_focus {
            self.invalidate(QueryKey::new(Vec::<String>::new()));
        }
    }

    fn fresh_value(&self, key: &QueryKey) -> Option<Arc<Value>> {
        let stale_time = self.inner.config.stale_time;
        self.inner
            .entries
            .lock()
            .get(key)
            .filter(|entry| entry.is_fresh(stale_time))
            .map(|entry| entry.value.clone())
    }

    async fn fetch_and_store<F, Fut>(self, id: u64, key: QueryKey, fetcher: F) -> Result<Arc<Value>, ApiError>
    where
        F: Fn(QueryKey) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        let started = Instant::now();
        let result = self
            .inner
            .config
            .query_retry
            .run(|| fetcher(key.clone()))
            .await
            .map(Arc::new);

        // Store and release the slot under one in-flight lock so callers see
        // either the running fetch or its stored result
        let mut in_flight = self.inner.in_flight.lock();
        let owns_slot = in_flight.get(&key).is_some_and(|slot| slot.id == id);
        if owns_slot {
            in_flight.remove(&key);
        }

        match &result {
            Ok(value) if owns_slot => {
                self.inner.entries.lock().insert(key.clone(), CacheEntry::new(value.clone()));
                tracing::debug!(
                    key = %key,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Query fetched"
                );
            }
            Ok(_) => tracing::debug!(key = %key, "Detached query finished, result not cached"),
            Err(error) => tracing::warn!(key = %key, error = %error, "Query failed"),
        }
        drop(in_flight);

        result
    }
}

/// Drop the in-flight slots under `prefix`. Returns how many were dropped.
fn detach(in_flight: &mut HashMap<QueryKey, InFlight>, prefix: &QueryKey) -> usize {
    let before = in_flight.len();
    in_flight.retain(|key, _| !key.starts_with(prefix));
    before - in_flight.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(
        calls: Arc<AtomicUsize>,
        value: Value,
    ) -> impl Fn(QueryKey) -> BoxFuture<'static, Result<Value, ApiError>> + Clone + Send + Sync + 'static {
        move |_key| {
            calls.fetch_add(1, Ordering::SeqCst);
            let value = value.clone();
            async move { Ok(value) }.boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_hit_skips_fetcher() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(calls.clone(), json!({ "balance": "5000" }));

        let first = client.query(["/api/wallet/1"], fetcher.clone()).await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        let second = client.query(["/api/wallet/1"], fetcher).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, json!({ "balance": "5000" }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_is_refetched() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(calls.clone(), json!(1));

        client.query("/api/wallet", fetcher.clone()).await.unwrap();
        tokio::time::advance(Duration::from_secs(5 * 60)).await;
        client.query("/api/wallet", fetcher).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_one_fetch() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let gate = gate.shared();

        let fetcher = {
            let calls = calls.clone();
            move |_key: QueryKey| {
                calls.fetch_add(1, Ordering::SeqCst);
                let gate = gate.clone();
                async move {
                    let _ = gate.await;
                    Ok(json!({ "balance": "5000" }))
                }
                .boxed()
            }
        };

        let a = tokio::spawn({
            let client = client.clone();
            let fetcher = fetcher.clone();
            async move { client.query("/api/wallet", fetcher).await }
        });
        let b = tokio::spawn({
            let client = client.clone();
            async move { client.query("/api/wallet", fetcher).await }
        });

        // Let both callers reach the in-flight fetch before it resolves
        while !client.is_fetching("/api/wallet") {
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        release.send(()).unwrap();

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!client.is_fetching("/api/wallet"));
    }

    /// First call waits for `gate` and answers OLD; later calls answer NEW at once.
    fn gated_fetcher(
        calls: Arc<AtomicUsize>,
        gate: Shared<tokio::sync::oneshot::Receiver<()>>,
    ) -> impl Fn(QueryKey) -> BoxFuture<'static, Result<Value, ApiError>> + Clone + Send + Sync + 'static {
        move |_key| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            let gate = gate.clone();
            async move {
                if n == 0 {
                    let _ = gate.await;
                    Ok(json!({ "balance": "OLD" }))
                } else {
                    Ok(json!({ "balance": "NEW" }))
                }
            }
            .boxed()
        }
    }

    async fn wait_until_fetching(client: &QueryClient, key: &str) {
        while !client.is_fetching(key) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_invalidate_during_fetch_is_not_undone() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let fetcher = gated_fetcher(calls.clone(), gate.shared());

        let first = tokio::spawn({
            let client = client.clone();
            let fetcher = fetcher.clone();
            async move { client.query("/api/wallet", fetcher).await }
        });
        wait_until_fetching(&client, "/api/wallet").await;

        client.invalidate("/api/wallet");
        release.send(()).unwrap();

        // The caller that started the fetch still gets its answer
        let old = first.await.unwrap().unwrap();
        assert_eq!(*old, json!({ "balance": "OLD" }));
        assert!(client.get_query_data("/api/wallet").is_none());

        let value = client.query("/api/wallet", fetcher).await.unwrap();
        assert_eq!(*value, json!({ "balance": "NEW" }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_query_after_invalidate_does_not_join_older_fetch() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let fetcher = gated_fetcher(calls.clone(), gate.shared());

        let first = tokio::spawn({
            let client = client.clone();
            let fetcher = fetcher.clone();
            async move { client.query("/api/wallet", fetcher).await }
        });
        wait_until_fetching(&client, "/api/wallet").await;

        client.invalidate("/api/wallet");
        let value = client.query("/api/wallet", fetcher).await.unwrap();
        assert_eq!(*value, json!({ "balance": "NEW" }));

        // The older fetch finishing late must not overwrite the newer value
        release.send(()).unwrap();
        first.await.unwrap().unwrap();
        assert_eq!(
            client.get_query_data("/api/wallet").as_deref(),
            Some(&json!({ "balance": "NEW" }))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_during_fetch_does_not_repopulate() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let fetcher = gated_fetcher(calls.clone(), gate.shared());

        let first = tokio::spawn({
            let client = client.clone();
            let fetcher = fetcher.clone();
            async move { client.query("/api/wallet", fetcher).await }
        });
        wait_until_fetching(&client, "/api/wallet").await;

        client.clear();
        assert!(!client.is_fetching("/api/wallet"));
        release.send(()).unwrap();
        first.await.unwrap().unwrap();

        assert!(client.get_query_data("/api/wallet").is_none());
        let value = client.query("/api/wallet", fetcher).await.unwrap();
        assert_eq!(*value, json!({ "balance": "NEW" }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_set_during_fetch_wins_over_fetch_result() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let fetcher = gated_fetcher(calls.clone(), gate.shared());

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.query("/api/user", fetcher).await }
        });
        wait_until_fetching(&client, "/api/user").await;

        client.set_query_data("/api/user", Value::Null);
        release.send(()).unwrap();
        first.await.unwrap().unwrap();

        assert_eq!(client.get_query_data("/api/user").as_deref(), Some(&Value::Null));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_final_error_and_cache_nothing() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = {
            let calls = calls.clone();
            move |_key: QueryKey| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    Err::<Value, _>(ApiError::RequestFailed { status: 503, message: format!("attempt {n}") })
                }
            }
        };

        let err = client.query("/api/wallet", fetcher).await.unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(err, ApiError::RequestFailed { status: 503, message: "attempt 3".into() });
        assert!(client.get_query_data("/api/wallet").is_none());
        assert!(!client.is_fetching("/api/wallet"));
    }

    #[tokio::test]
    async fn test_unauthorized_query_is_not_retried() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = {
            let calls = calls.clone();
            move |_key: QueryKey| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<Value, _>(ApiError::Unauthorized { message: "Unauthorized".into() }) }
            }
        };

        let err = client.query("/api/user", fetcher).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_of_prefix_only() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(calls.clone(), json!("v"));

        client.query(["/api/wallet", "1"], fetcher.clone()).await.unwrap();
        client.query(["/api/wallet", "2"], fetcher.clone()).await.unwrap();
        client.query("/api/user", fetcher.clone()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        assert_eq!(client.invalidate("/api/wallet"), 2);
        client.query(["/api/wallet", "1"], fetcher.clone()).await.unwrap();
        client.query("/api/user", fetcher).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_mutation_is_not_cached_and_retries() {
        let client = QueryClient::new(QueryConfig {
            mutation_retry: RetryPolicy::default().without_delay(),
            ..QueryConfig::default()
        });
        let calls = AtomicUsize::new(0);

        let result = client
            .mutate(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ApiError::Network("reset".into()))
                    } else {
                        Ok(json!({ "transferred": "100" }))
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, json!({ "transferred": "100" }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(client.inner.entries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_set_remove_and_typed_reads() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Wallet {
            balance: String,
        }

        let client = QueryClient::default();
        client.set_query_data(["/api/wallet", "1"], json!({ "balance": "5000" }));

        let calls = Arc::new(AtomicUsize::new(0));
        let wallet: Wallet = client
            .query_as(["/api/wallet", "1"], counting_fetcher(calls.clone(), json!(null)))
            .await
            .unwrap();
        assert_eq!(wallet, Wallet { balance: "5000".into() });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(client.remove("/api/wallet"), 1);
        assert!(client.get_query_data(["/api/wallet", "1"]).is_none());
    }

    #[tokio::test]
    async fn test_window_focus_refetch_disabled_by_default() {
        let client = QueryClient::default();
        client.set_query_data("/api/user", json!({ "id": 1 }));
        client.on_window_focus();
        assert!(client.fresh_value(&QueryKey::from("/api/user")).is_some());

        let eager = QueryClient::new(QueryConfig {
            refetch_on_window_focus: true,
            ..QueryConfig::default()
        });
        eager.set_query_data("/api/user", json!({ "id": 1 }));
        eager.on_window_focus();
        assert!(eager.fresh_value(&QueryKey::from("/api/user")).is_none());
    }
}
