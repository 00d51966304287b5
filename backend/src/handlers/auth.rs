//! # Authentication Handlers
//!
//! Account registration and cookie-session login/logout.
//!
//! ## Overview
//!
//! - `register` creates a `user`-role account and signs it in
//! - `login` verifies the Argon2 hash and opens a session
//! - `logout` deletes the session and clears the cookie
//! - `current_user` returns the session's account, 401 when there is none
//!
//! Login and registration answer with the [`UserInfo`] body and a
//! `Set-Cookie: sid=...; HttpOnly; Path=/; SameSite=Lax` header.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use lib_auth::{hash_password, verify_password, Session};
use lib_utils::{validate_email, validate_min_length, validate_required};
use shared::{LoginRequest, MessageResponse, RegisterRequest, Role, UserInfo};
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, Result};
use crate::middleware::mw_auth::{session_cookie, session_cookie_removal, session_id};
use crate::middleware::CurrentUser;
use crate::server::AppState;
use crate::store::{User, UserForCreate};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// `POST /api/register`
///
/// # Validation
///
/// - Username, email and password are required
/// - Username must be at least 3 characters
/// - Email must look like `local@domain.tld`
/// - Password must be at least 8 characters
/// - Username and email must be unique (409 otherwise)
#[instrument(skip(state, jar, req), fields(username = %req.username))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    info!("[REGISTER] New account request");

    validate_required(&[
        ("Username", req.username.as_str()),
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
    ])
    .map_err(AppError::InvalidInput)?;
    validate_min_length(req.username.trim(), 3, "Username").map_err(AppError::InvalidInput)?;
    validate_email(req.email.trim()).map_err(AppError::InvalidInput)?;

    let password_hash = hash_password(&req.password)?;

    let user = state
        .store
        .create_user(UserForCreate {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            password_hash,
            role: Role::User,
            full_name: req.full_name.filter(|name| !name.trim().is_empty()),
            wallet_address: req.wallet_address.filter(|address| !address.trim().is_empty()),
        })
        .await
        .inspect_err(|e| warn!("[REGISTER] Rejected: {}", e))?;

    let cookie = open_session(&state, &user).await?;
    info!(user_id = user.id, "[REGISTER] Account created");

    Ok((StatusCode::CREATED, jar.add(cookie), Json(user.to_info())))
}

/// `POST /api/login`
///
/// Blank fields are a 400. Unknown usernames and wrong passwords get the
/// same 401 message.
#[instrument(skip(state, jar, req), fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    validate_required(&[("Username", req.username.as_str()), ("password", req.password.as_str())])
        .map_err(AppError::InvalidInput)?;

    let Some(user) = state.store.find_by_username(req.username.trim()).await? else {
        warn!("[LOGIN] Unknown username");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "[LOGIN] Wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let cookie = open_session(&state, &user).await?;
    info!(user_id = user.id, role = ?user.role, "[LOGIN] Login successful");

    Ok((jar.add(cookie), Json(user.to_info())))
}

/// `POST /api/logout`
///
/// Always succeeds. A presented `sid` cookie is expired in the response.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse> {
    if let Some(sid) = session_id(&jar) {
        let removed = state.store.delete_session(&sid).await?;
        debug!(removed, "[LOGOUT] Session deleted");
    }

    Ok((
        jar.remove(session_cookie_removal()),
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    ))
}

/// `GET /api/user`
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(user.to_info())
}

async fn open_session(state: &AppState, user: &User) -> Result<Cookie<'static>> {
    let session = Session::open(user.id, state.config.session_ttl_hours);
    let cookie = session_cookie(&session);
    state.store.insert_session(session).await?;
    Ok(cookie)
}
