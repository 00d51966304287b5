//! # Session Authentication
//!
//! Extractors that resolve the `sid` cookie to the signed-in account.
//!
//! ```rust,ignore
//! async fn wallet(CurrentUser(user): CurrentUser) -> Json<WalletResponse> { ... }
//! async fn users(AdminUser(admin): AdminUser, State(state): State<AppState>) -> ... { ... }
//! ```
//!
//! Missing, unknown or expired sessions reject with 401
//! `{"message":"Not authenticated"}`. A signed-in account without the
//! required role is rejected from [`AdminUser`] and [`SuperadminUser`]
//! routes with 403.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lib_auth::Session;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::server::AppState;
use crate::store::User;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// The account owning the request's session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// A signed-in `admin` or `superadmin`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// A signed-in `superadmin`.
#[derive(Debug, Clone)]
pub struct SuperadminUser(pub User);

/// Session id from the request's cookies, if any.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// `sid` cookie naming `session`. The browser keeps it until it closes; the
/// server enforces the session's own expiry.
pub fn session_cookie(session: &Session) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.id.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Cookie matching [`session_cookie`] for [`CookieJar::remove`].
pub fn session_cookie_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(sid) = session_id(&jar) else {
            debug!("[AUTH] No session cookie");
            return Err(AppError::not_authenticated());
        };

        let Some(session) = state.store.find_session(&sid).await? else {
            debug!("[AUTH] Unknown session");
            return Err(AppError::not_authenticated());
        };

        if session.is_expired() {
            debug!(user_id = session.user_id, "[AUTH] Session expired");
            state.store.delete_session(&sid).await?;
            return Err(AppError::not_authenticated());
        }

        match state.store.find_by_id(session.user_id).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(user_id = session.user_id, "[AUTH] Session for missing user");
                state.store.delete_session(&sid).await?;
                Err(AppError::not_authenticated())
            }
        }
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            warn!(user_id = user.id, "[AUTH] Admin route denied");
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

impl FromRequestParts<AppState> for SuperadminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.is_superadmin() {
            warn!(user_id = user.id, "[AUTH] Superadmin route denied");
            return Err(AppError::Forbidden("Superadmin access required".to_string()));
        }
        Ok(SuperadminUser(user))
    }
}
