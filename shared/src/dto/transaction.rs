use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wallet::WalletResponse;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Wallet to wallet
    Transfer,
    /// New funds credited to the treasury by a superadmin
    Mint,
}

/// A completed ledger entry.
///
/// `sender_id` is `None` for mints. `amount` is a decimal string with two
/// fraction digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionInfo {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub sender_id: Option<i64>,
    pub receiver_id: i64,
    pub amount: String,
    pub currency: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/transactions/transfer` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TransferRequest {
    #[serde(default)]
    pub recipient_address: String,
    /// Decimal string, e.g. `"250.50"`
    #[serde(default)]
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `POST /api/superadmin/mint` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MintRequest {
    #[serde(default)]
    pub amount: String,
}

/// Mint result: the ledger entry and the treasury wallet after the credit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintResponse {
    pub transaction: TransactionInfo,
    pub wallet: WalletResponse,
}
