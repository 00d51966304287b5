//! # Wallet Query Endpoints
//!
//! Cached reads of the session user's wallet and, for admins, the user list.

use std::sync::Arc;

use shared::dto::auth::UserInfo;
use shared::dto::wallet::WalletResponse;

use crate::core::{ApiError, ApiService};
use crate::query::{make_query_fn, On401, QueryClient};

pub const WALLET_QUERY_KEY: &str = "/api/wallet";
pub const ADMIN_USERS_QUERY_KEY: &str = "/api/admin/users";

/// Balance of the signed-in user. 401 propagates.
pub async fn fetch_wallet(queries: &QueryClient, api: Arc<dyn ApiService>) -> Result<WalletResponse, ApiError> {
    queries
        .query_as(WALLET_QUERY_KEY, make_query_fn(api, On401::Throw))
        .await
}

/// Every registered user. Needs an admin or superadmin session.
pub async fn list_users(queries: &QueryClient, api: Arc<dyn ApiService>) -> Result<Vec<UserInfo>, ApiError> {
    queries
        .query_as(ADMIN_USERS_QUERY_KEY, make_query_fn(api, On401::Throw))
        .await
}
