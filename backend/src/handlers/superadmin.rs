//! # Superadmin Handlers

use axum::{extract::State, Json};
use shared::{parse_amount, MintRequest, MintResponse};
use tracing::info;

use crate::error::{AppError, Result};
use crate::handlers::wallet::wallet_of;
use crate::middleware::SuperadminUser;
use crate::server::AppState;

/// `POST /api/superadmin/mint` - credit new funds to the caller's treasury wallet.
pub async fn mint(
    SuperadminUser(admin): SuperadminUser,
    State(state): State<AppState>,
    Json(req): Json<MintRequest>,
) -> Result<Json<MintResponse>> {
    let amount =
        parse_amount(&req.amount).ok_or_else(|| AppError::InvalidInput("Valid amount is required".to_string()))?;

    let (transaction, treasury) = state.store.mint(admin.id, amount).await?;
    info!(admin_id = admin.id, tx_id = transaction.id, amount, "[MINT] Funds minted");

    Ok(Json(MintResponse {
        transaction: transaction.to_info(),
        wallet: wallet_of(&treasury),
    }))
}
