//! # Wallet Handlers

use axum::Json;
use shared::{format_amount, WalletResponse};
use tracing::debug;

use crate::middleware::CurrentUser;
use crate::store::{User, CURRENCY};

/// `GET /api/wallet` - balance of the signed-in user.
pub async fn get_wallet(CurrentUser(user): CurrentUser) -> Json<WalletResponse> {
    debug!(user_id = user.id, "[WALLET] Balance requested");
    Json(wallet_of(&user))
}

pub(crate) fn wallet_of(user: &User) -> WalletResponse {
    WalletResponse {
        user_id: user.id,
        balance: format_amount(user.balance),
        currency: CURRENCY.to_string(),
    }
}
