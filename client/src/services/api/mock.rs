//! In-memory [`ApiService`] for service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;

use crate::core::{ApiError, ApiService};

/// Scripted responses per `(method, url)`.
///
/// Each route answers with its queued results in order and repeats the last
/// one once the queue is down to a single entry. Unscripted routes fail with
/// a 404 `RequestFailed`.
#[derive(Default)]
pub(crate) struct MockApi {
    routes: Mutex<HashMap<(Method, String), VecDeque<Result<Value, ApiError>>>>,
    calls: Mutex<Vec<(Method, String, Option<Value>)>>,
}

impl MockApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn on(&self, method: Method, url: &str, result: Result<Value, ApiError>) -> &Self {
        self.routes
            .lock()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Method, String, Option<Value>)> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self, method: Method, url: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(m, u, _)| *m == method && u == url)
            .count()
    }

    fn answer(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.calls.lock().push((method.clone(), url.to_string(), body));

        let mut routes = self.routes.lock();
        let Some(queue) = routes.get_mut(&(method, url.to_string())) else {
            return Err(ApiError::RequestFailed {
                status: 404,
                message: format!("no route for {url}"),
            });
        };
        match queue.len() {
            0 => Err(ApiError::RequestFailed { status: 404, message: "exhausted".into() }),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap_or(Ok(Value::Null)),
        }
    }
}

#[async_trait]
impl ApiService for MockApi {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        self.answer(Method::GET, url, None)
    }

    async fn send_json(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.answer(method, url, body)
    }
}
