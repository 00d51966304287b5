//! # Authentication Endpoints
//!
//! Session lifecycle on top of the query cache. The signed-in user lives in
//! the cache under [`USER_QUERY_KEY`]; login and registration write it,
//! logout replaces it with `null` and drops everything else.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use shared::dto::auth::{LoginRequest, RegisterRequest, UserInfo};

use crate::core::{ApiError, ApiService};
use crate::query::{make_query_fn, On401, QueryClient};
use crate::routing::AuthState;

/// Cache key (and URL) of the session user.
pub const USER_QUERY_KEY: &str = "/api/user";

const LOGIN_URL: &str = "/api/login";
const REGISTER_URL: &str = "/api/register";
const LOGOUT_URL: &str = "/api/logout";

/// Session user state shared by every view.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn ApiService>,
    queries: QueryClient,
}

impl AuthService {
    pub fn new(api: Arc<dyn ApiService>, queries: QueryClient) -> Self {
        Self { api, queries }
    }

    /// The signed-in user, or `None` when the server answers 401.
    pub async fn current_user(&self) -> Result<Option<UserInfo>, ApiError> {
        self.queries
            .query_as(USER_QUERY_KEY, make_query_fn(self.api.clone(), On401::ReturnNull))
            .await
    }

    /// Snapshot for [`RouteGuard`](crate::routing::RouteGuard) without I/O.
    ///
    /// Loading until the user query has resolved once. A background refetch
    /// keeps reporting the cached user.
    pub fn state(&self) -> AuthState {
        let cached = self.queries.get_query_data(USER_QUERY_KEY);
        let loading = cached.is_none();
        let user = cached
            .and_then(|value| serde_json::from_value::<Option<UserInfo>>(value.as_ref().clone()).ok())
            .flatten();

        AuthState { loading, user }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserInfo, ApiError> {
        let body = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        let user = self.establish_session(LOGIN_URL, body).await?;
        tracing::info!(user_id = user.id, "Login successful");
        Ok(user)
    }

    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserInfo, ApiError> {
        let body = serde_json::to_value(request)?;

        let user = self.establish_session(REGISTER_URL, body).await?;
        tracing::info!(user_id = user.id, "Registration successful");
        Ok(user)
    }

    /// End the session and forget everything cached for it.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(Method::POST, LOGOUT_URL, None).await?;

        self.queries.clear();
        self.queries.set_query_data(USER_QUERY_KEY, Value::Null);
        tracing::info!("Logout successful");
        Ok(())
    }

    async fn establish_session(&self, url: &'static str, body: Value) -> Result<UserInfo, ApiError> {
        let value = self.send(Method::POST, url, Some(body)).await?;
        let user: UserInfo = serde_json::from_value(value.clone())?;

        self.queries.set_query_data(USER_QUERY_KEY, value);
        Ok(user)
    }

    async fn send(&self, method: Method, url: &'static str, body: Option<Value>) -> Result<Value, ApiError> {
        let api = self.api.clone();
        self.queries
            .mutate(move || {
                let api = api.clone();
                let method = method.clone();
                let body = body.clone();
                async move { api.send_json(method, url, body).await }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryConfig, RetryPolicy};
    use crate::routing::{GuardDecision, RouteGuard};
    use crate::services::api::mock::MockApi;
    use serde_json::json;
    use shared::dto::auth::Role;

    fn queries() -> QueryClient {
        let retry = RetryPolicy::default().without_delay();
        QueryClient::new(QueryConfig {
            query_retry: retry,
            mutation_retry: retry,
            ..QueryConfig::default()
        })
    }

    fn sita() -> Value {
        json!({ "id": 7, "username": "sita", "email": "sita@example.com", "role": "user" })
    }

    fn unauthorized() -> ApiError {
        ApiError::Unauthorized { message: "Not authenticated".into() }
    }

    #[tokio::test]
    async fn test_logged_out_user_is_none() {
        let api = MockApi::new();
        api.on(Method::GET, USER_QUERY_KEY, Err(unauthorized()));
        let auth = AuthService::new(api.clone(), queries());

        assert_eq!(auth.state(), AuthState { loading: true, user: None });
        assert_eq!(auth.current_user().await, Ok(None));

        let state = auth.state();
        assert!(!state.loading);
        assert_eq!(RouteGuard::new().decide(&state), GuardDecision::Redirect("/auth"));
        // 401 is never retried
        assert_eq!(api.call_count(Method::GET, USER_QUERY_KEY), 1);
    }

    #[tokio::test]
    async fn test_login_caches_user() {
        let api = MockApi::new();
        api.on(Method::POST, LOGIN_URL, Ok(sita()));
        let auth = AuthService::new(api.clone(), queries());

        let user = auth.login("sita", "correct horse").await.unwrap();
        assert_eq!(user.role, Role::User);

        // Served from the cache, no GET /api/user
        assert_eq!(auth.current_user().await.unwrap(), Some(user.clone()));
        assert_eq!(api.call_count(Method::GET, USER_QUERY_KEY), 0);

        let state = auth.state();
        assert_eq!(RouteGuard::new().decide(&state), GuardDecision::Render);
        assert_eq!(RouteGuard::admin().decide(&state), GuardDecision::Redirect("/"));

        let (_, _, body) = &api.calls()[0];
        assert_eq!(body.as_ref().unwrap()["username"], "sita");
    }

    #[tokio::test]
    async fn test_refetch_keeps_signed_in_state() {
        use futures::FutureExt;

        let api = MockApi::new();
        api.on(Method::POST, LOGIN_URL, Ok(sita()));
        let queries = queries();
        let auth = AuthService::new(api.clone(), queries.clone());
        auth.login("sita", "correct horse").await.unwrap();

        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let gate = gate.shared();
        queries.invalidate(USER_QUERY_KEY);
        let refetch = tokio::spawn({
            let queries = queries.clone();
            async move {
                queries
                    .query(USER_QUERY_KEY, move |_| {
                        let gate = gate.clone();
                        async move {
                            let _ = gate.await;
                            Ok(sita())
                        }
                    })
                    .await
            }
        });
        while !queries.is_fetching(USER_QUERY_KEY) {
            tokio::task::yield_now().await;
        }

        let state = auth.state();
        assert!(!state.loading);
        assert_eq!(RouteGuard::new().decide(&state), GuardDecision::Render);

        release.send(()).unwrap();
        refetch.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bad_credentials_not_retried() {
        let api = MockApi::new();
        api.on(
            Method::POST,
            LOGIN_URL,
            Err(ApiError::Unauthorized { message: "Invalid username or password".into() }),
        );
        let auth = AuthService::new(api.clone(), queries());

        let err = auth.login("sita", "wrong").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(api.call_count(Method::POST, LOGIN_URL), 1);
        assert!(auth.state().user.is_none());
    }

    #[tokio::test]
    async fn test_register_retries_server_errors() {
        let api = MockApi::new();
        api.on(
            Method::POST,
            REGISTER_URL,
            Err(ApiError::RequestFailed { status: 503, message: "busy".into() }),
        )
        .on(Method::POST, REGISTER_URL, Ok(sita()));
        let auth = AuthService::new(api.clone(), queries());

        let request = RegisterRequest {
            username: "sita".into(),
            email: "sita@example.com".into(),
            password: "correct horse".into(),
            ..RegisterRequest::default()
        };
        let user = auth.register(&request).await.unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(api.call_count(Method::POST, REGISTER_URL), 2);
    }

    #[tokio::test]
    async fn test_logout_clears_cache() {
        let api = MockApi::new();
        api.on(Method::POST, LOGIN_URL, Ok(sita()))
            .on(Method::POST, LOGOUT_URL, Ok(json!({ "message": "Logout successful" })));
        let queries = queries();
        let auth = AuthService::new(api.clone(), queries.clone());

        auth.login("sita", "correct horse").await.unwrap();
        queries.set_query_data("/api/wallet", json!({ "balance": "5000.00" }));

        auth.logout().await.unwrap();

        assert!(queries.get_query_data("/api/wallet").is_none());
        assert_eq!(auth.state(), AuthState::signed_out());
        assert_eq!(auth.current_user().await, Ok(None));
    }
}
