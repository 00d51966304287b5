//! # Transaction Handlers
//!
//! Wallet-to-wallet transfers and the signed-in user's history.
//!
//! ## Transfer Rules
//!
//! - `recipient_address` and `amount` are required (400)
//! - `amount` is a positive decimal with at most two fraction digits (400)
//! - The sender's balance must cover the amount (400 `Insufficient balance`)
//! - The recipient is looked up by wallet address (404 `Recipient not found`)
//! - Sending to your own wallet is refused (400)

use axum::{extract::State, http::StatusCode, Json};
use lib_utils::validate_required;
use shared::{parse_amount, TransactionInfo, TransferRequest};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::server::AppState;
use crate::store::TransferForCreate;

const DEFAULT_DESCRIPTION: &str = "Transfer";

/// `GET /api/transactions`
pub async fn list_transactions(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionInfo>>> {
    let transactions = state.store.list_transactions(user.id).await?;
    Ok(Json(transactions.iter().map(|t| t.to_info()).collect()))
}

/// `POST /api/transactions/transfer` - 201 with the new ledger entry.
pub async fn transfer(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransactionInfo>)> {
    validate_required(&[
        ("Recipient address", req.recipient_address.as_str()),
        ("amount", req.amount.as_str()),
    ])
    .map_err(AppError::InvalidInput)?;
    let amount =
        parse_amount(&req.amount).ok_or_else(|| AppError::InvalidInput("Valid amount is required".to_string()))?;

    let description = req
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let transaction = state
        .store
        .transfer(TransferForCreate {
            sender_id: user.id,
            recipient_address: req.recipient_address.trim().to_string(),
            amount,
            description,
        })
        .await
        .inspect_err(|e| warn!(sender_id = user.id, "[TRANSFER] Rejected: {}", e))?;

    info!(
        sender_id = user.id,
        tx_id = transaction.id,
        receiver_id = transaction.receiver_id,
        amount,
        "[TRANSFER] Completed"
    );
    Ok((StatusCode::CREATED, Json(transaction.to_info())))
}
