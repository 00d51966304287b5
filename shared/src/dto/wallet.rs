use serde::{Deserialize, Serialize};

/// Wallet balance for the session user.
///
/// `balance` is a decimal string so no precision is lost on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletResponse {
    pub user_id: i64,
    pub balance: String,
    pub currency: String,
}
