//! # Admin Handlers

use axum::{extract::State, Json};
use shared::UserInfo;
use tracing::info;

use crate::error::Result;
use crate::middleware::AdminUser;
use crate::server::AppState;

/// `GET /api/admin/users` - every account. Admin or superadmin only.
pub async fn list_users(AdminUser(admin): AdminUser, State(state): State<AppState>) -> Result<Json<Vec<UserInfo>>> {
    let users: Vec<UserInfo> = state.store.list_users().await?.iter().map(|u| u.to_info()).collect();
    info!(admin_id = admin.id, count = users.len(), "[ADMIN] Listed users");
    Ok(Json(users))
}
