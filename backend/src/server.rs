//! # Server Setup
//!
//! Route registration, middleware stack and HTTP server startup.

// region: --- Imports
use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use lib_auth::hash_password;
use shared::Role;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::{SeedAdmin, ServerConfig};
use crate::handlers;
use crate::middleware::{log_requests, stamp_req, RequestStamp};
use crate::store::{MemoryStore, StoreError, UserForCreate, UserStore};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
// endregion: --- AppState

// region: --- Server Setup
/// Configure the global tracing subscriber from `LOG_LEVEL` (default `info`).
pub fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => tracing_subscriber::EnvFilter::new(&log_level),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .try_init();

    if initialized.is_ok() {
        info!("Log level: {}", log_level);
    }
}

/// Initialize and run the HTTP server until it fails.
///
/// # Errors
///
/// - Seeding the superadmin account fails
/// - Binding the listen address fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("PAISA WALLET API STARTING");

    let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
    if let Some(admin) = &config.seed_admin {
        seed_admin(store.as_ref(), admin).await?;
    }

    let bind_address = config.bind_address();
    let app = create_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("SERVER READY: http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the superadmin account unless the username is already taken.
pub async fn seed_admin(store: &dyn UserStore, admin: &SeedAdmin) -> anyhow::Result<()> {
    let password_hash = hash_password(&admin.password)?;

    let created = store
        .create_user(UserForCreate {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: Role::Superadmin,
            full_name: None,
            wallet_address: None,
        })
        .await;

    match created {
        Ok(user) => info!(user_id = user.id, username = %user.username, "Seeded superadmin"),
        Err(StoreError::Conflict(reason)) => info!("Superadmin not seeded: {}", reason),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentialed CORS: explicit origins, methods and headers only
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/logout", post(handlers::auth::logout))
        .route("/api/user", get(handlers::auth::current_user))
        .route("/api/wallet", get(handlers::wallet::get_wallet))
        .route("/api/transactions", get(handlers::transactions::list_transactions))
        .route("/api/transactions/transfer", post(handlers::transactions::transfer))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/superadmin/mint", post(handlers::superadmin::mint))
        .with_state(state)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestStamp>()
                    .map(|s| s.id.clone())
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(axum::middleware::from_fn(log_requests))
        // Outermost of the three so the logger and the span see the request ID
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
}
// endregion: --- Server Setup

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{
        header::{COOKIE, SET_COOKIE},
        Request, StatusCode,
    };
    use serde_json::json;
    use shared::{ErrorResponse, HealthResponse, MintResponse, TransactionKind, UserInfo, WalletResponse};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), ServerConfig::default())
    }

    async fn login_cookie(app: &Router, username: &str, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/login")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "username": username, "password": password }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn register(app: &Router, username: &str) {
        let body = json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "TestPassword123!",
        });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/register")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_up_and_stamped() {
        let app = create_router(test_state());

        let response = app.oneshot(get("/api/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let health: HealthResponse = body_json(response).await;
        assert_eq!(health, HealthResponse::up());
    }

    #[tokio::test]
    async fn test_wallet_requires_session() {
        let app = create_router(test_state());

        let response = app.oneshot(get("/api/wallet", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.message.as_deref(), Some("Not authenticated"));
    }

    #[tokio::test]
    async fn test_wallet_for_signed_in_user() {
        let app = create_router(test_state());
        register(&app, "sita").await;
        let cookie = login_cookie(&app, "sita", "TestPassword123!").await;

        let response = app.oneshot(get("/api/wallet", Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let wallet: WalletResponse = body_json(response).await;
        assert_eq!(wallet.balance, "5000.00");
        assert_eq!(wallet.currency, "NPR");
    }

    #[tokio::test]
    async fn test_admin_users_forbidden_for_user_role() {
        let app = create_router(test_state());
        register(&app, "sita").await;
        let cookie = login_cookie(&app, "sita", "TestPassword123!").await;

        let response = app.oneshot(get("/api/admin/users", Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.message.as_deref(), Some("Admin access required"));
    }

    #[tokio::test]
    async fn test_admin_users_for_seeded_superadmin() {
        let state = test_state();
        let admin = SeedAdmin {
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: "RootPassword123!".to_string(),
        };
        seed_admin(state.store.as_ref(), &admin).await.unwrap();
        // Seeding twice is a no-op
        seed_admin(state.store.as_ref(), &admin).await.unwrap();

        let app = create_router(state);
        register(&app, "sita").await;
        let cookie = login_cookie(&app, "root", "RootPassword123!").await;

        let response = app.oneshot(get("/api/admin/users", Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let users: Vec<UserInfo> = body_json(response).await;
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["root", "sita"]);
        assert_eq!(users[0].role, Role::Superadmin);
    }

    fn post_json(uri: &str, cookie: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header(COOKIE, cookie)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_mint_is_superadmin_only() {
        let state = test_state();
        let admin = SeedAdmin {
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: "RootPassword123!".to_string(),
        };
        seed_admin(state.store.as_ref(), &admin).await.unwrap();
        let app = create_router(state);

        register(&app, "sita").await;
        let user_cookie = login_cookie(&app, "sita", "TestPassword123!").await;
        let response = app
            .clone()
            .oneshot(post_json("/api/superadmin/mint", &user_cookie, json!({ "amount": "100" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.message.as_deref(), Some("Superadmin access required"));

        let root_cookie = login_cookie(&app, "root", "RootPassword123!").await;
        let response = app
            .clone()
            .oneshot(post_json("/api/superadmin/mint", &root_cookie, json!({ "amount": "0" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json("/api/superadmin/mint", &root_cookie, json!({ "amount": "1000.25" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let minted: MintResponse = body_json(response).await;
        assert_eq!(minted.wallet.balance, "6000.25");
        assert_eq!(minted.transaction.kind, TransactionKind::Mint);
        assert_eq!(minted.transaction.sender_id, None);
    }
}
