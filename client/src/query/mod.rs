//! # Query Layer
//!
//! Cached reads and retried writes over the API transport.
//!
//! ```text
//! UI code ──► QueryClient::query(key, fetcher) ──► fetcher (make_query_fn) ──► ApiService ──► network
//!                  │   fresh hit: cached Arc<Value>
//!                  │   in flight: join the running fetch
//!                  └── miss: RetryPolicy::run(fetcher), store on success
//! ```
//!
//! ## Module Structure
//!
//! - `key.rs`      - [`QueryKey`], the ordered cache key
//! - `retry.rs`    - [`RetryPolicy`], shared retry decision and backoff
//! - `cache.rs`    - [`QueryClient`] and [`QueryConfig`]
//! - `query_fn.rs` - [`make_query_fn`] and [`On401`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wallet_client::config::ClientConfig;
//! use wallet_client::query::{make_query_fn, On401, QueryClient};
//! use wallet_client::services::api::ApiClient;
//!
//! # async fn run() -> wallet_client::core::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let api = Arc::new(ApiClient::new(&config)?);
//! let queries = QueryClient::new(config.query_config());
//!
//! let wallet = queries
//!     .query(["/api/wallet"], make_query_fn(api, On401::Throw))
//!     .await?;
//! println!("{wallet}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod key;
pub mod query_fn;
pub mod retry;

pub use cache::{QueryClient, QueryConfig};
pub use key::QueryKey;
pub use query_fn::{make_query_fn, On401};
pub use retry::RetryPolicy;
