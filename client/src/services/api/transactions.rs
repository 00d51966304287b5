//! # Transaction Endpoints
//!
//! Transaction history query plus the two writes that move money. Both
//! writes run through [`QueryClient::mutate`] and, on success, invalidate
//! the wallet and history queries so the next read refetches them.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use shared::dto::transaction::{MintRequest, MintResponse, TransactionInfo, TransferRequest};

use super::wallet::WALLET_QUERY_KEY;
use crate::core::{ApiError, ApiService};
use crate::query::{make_query_fn, On401, QueryClient};

pub const TRANSACTIONS_QUERY_KEY: &str = "/api/transactions";

const TRANSFER_URL: &str = "/api/transactions/transfer";
const MINT_URL: &str = "/api/superadmin/mint";

/// Transactions sent or received by the signed-in user, newest first.
pub async fn fetch_transactions(
    queries: &QueryClient,
    api: Arc<dyn ApiService>,
) -> Result<Vec<TransactionInfo>, ApiError> {
    queries
        .query_as(TRANSACTIONS_QUERY_KEY, make_query_fn(api, On401::Throw))
        .await
}

/// Send funds to another wallet.
#[tracing::instrument(skip(queries, api, request), fields(amount = %request.amount))]
pub async fn transfer(
    queries: &QueryClient,
    api: Arc<dyn ApiService>,
    request: &TransferRequest,
) -> Result<TransactionInfo, ApiError> {
    let value = post(queries, api, TRANSFER_URL, serde_json::to_value(request)?).await?;
    let transaction: TransactionInfo = serde_json::from_value(value)?;

    refresh_balances(queries);
    tracing::info!(tx_id = transaction.id, "Transfer completed");
    Ok(transaction)
}

/// Credit new funds to the superadmin's treasury wallet.
#[tracing::instrument(skip(queries, api))]
pub async fn mint(queries: &QueryClient, api: Arc<dyn ApiService>, amount: &str) -> Result<MintResponse, ApiError> {
    let body = serde_json::to_value(MintRequest {
        amount: amount.to_string(),
    })?;
    let value = post(queries, api, MINT_URL, body).await?;
    let minted: MintResponse = serde_json::from_value(value)?;

    refresh_balances(queries);
    tracing::info!(tx_id = minted.transaction.id, "Mint completed");
    Ok(minted)
}

fn refresh_balances(queries: &QueryClient) {
    queries.invalidate(WALLET_QUERY_KEY);
    queries.invalidate(TRANSACTIONS_QUERY_KEY);
}

async fn post(
    queries: &QueryClient,
    api: Arc<dyn ApiService>,
    url: &'static str,
    body: Value,
) -> Result<Value, ApiError> {
    queries
        .mutate(move || {
            let api = api.clone();
            let body = body.clone();
            async move { api.send_json(Method::POST, url, Some(body)).await }
        })
        .await
}
