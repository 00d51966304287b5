//! # User, Session and Ledger Store
//!
//! Storage seam for accounts, login sessions and wallet transactions.
//! Handlers only see [`UserStore`]; [`MemoryStore`] is the in-process
//! implementation used by the server binary and the tests.
//!
//! Balances and amounts are integer paisa. Transfers and mints update both
//! balances and append the ledger entry under one write lock.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lib_auth::Session;
use shared::{format_amount, Role, TransactionInfo, TransactionKind, UserInfo};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Balance credited to every new account, in paisa (5000.00).
pub const OPENING_BALANCE: i64 = 500_000;
pub const CURRENCY: &str = "NPR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Unique username, email or wallet address already taken
    #[error("{0}")]
    Conflict(String),

    /// Referenced account or wallet does not exist
    #[error("{0}")]
    NotFound(String),

    /// Operation refused by a ledger rule (e.g. insufficient balance)
    #[error("{0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A complete account record. Never sent to clients; see [`User::to_info`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub wallet_address: String,
    /// Paisa
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            wallet_address: self.wallet_address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub kind: TransactionKind,
    pub sender_id: Option<i64>,
    pub receiver_id: i64,
    /// Paisa
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn to_info(&self) -> TransactionInfo {
        TransactionInfo {
            id: self.id,
            kind: self.kind,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            amount: format_amount(self.amount),
            currency: CURRENCY.to_string(),
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }
}

/// Fields required to create an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: Option<String>,
    /// Generated when absent
    pub wallet_address: Option<String>,
}

/// A wallet-to-wallet payment. `amount` is positive paisa.
#[derive(Debug, Clone)]
pub struct TransferForCreate {
    pub sender_id: i64,
    pub recipient_address: String,
    pub amount: i64,
    pub description: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the username or email is taken.
    async fn create_user(&self, user: UserForCreate) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// All accounts, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Also drops every expired session.
    async fn insert_session(&self, session: Session) -> Result<(), StoreError>;

    async fn find_session(&self, id: &str) -> Result<Option<Session>, StoreError>;

    /// Returns `false` if there was no such session.
    async fn delete_session(&self, id: &str) -> Result<bool, StoreError>;

    /// Move funds between wallets.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] for an unknown sender or recipient
    /// - [`StoreError::Rejected`] when the balance is too low or the
    ///   recipient is the sender
    async fn transfer(&self, transfer: TransferForCreate) -> Result<Transaction, StoreError>;

    /// Credit `amount` paisa of new funds to `user_id`. Returns the ledger
    /// entry and the account after the credit.
    async fn mint(&self, user_id: i64, amount: i64) -> Result<(Transaction, User), StoreError>;

    /// Transactions sent or received by `user_id`, newest first.
    async fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError>;
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    transactions: Vec<Transaction>,
}

impl MemoryState {
    fn user_index(&self, id: i64) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    fn record(
        &mut self,
        kind: TransactionKind,
        sender_id: Option<i64>,
        receiver_id: i64,
        amount: i64,
        description: String,
    ) -> Transaction {
        let transaction = Transaction {
            id: self.transactions.last().map(|t| t.id + 1).unwrap_or(1),
            kind,
            sender_id,
            receiver_id,
            amount,
            description,
            created_at: Utc::now(),
        };
        self.transactions.push(transaction.clone());
        transaction
    }
}

/// In-memory [`UserStore`]. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: UserForCreate) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.username.eq_ignore_ascii_case(&user.username)) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }
        if state.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }
        let wallet_address = match user.wallet_address {
            Some(address) if state.users.iter().any(|u| u.wallet_address == address) => {
                return Err(StoreError::Conflict("Wallet address already registered".to_string()));
            }
            Some(address) => address,
            None => format!("0x{}", Uuid::new_v4().simple()),
        };

        let id = state.users.last().map(|u| u.id + 1).unwrap_or(1);
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            full_name: user.full_name,
            wallet_address,
            balance: OPENING_BALANCE,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());

        tracing::debug!(user_id = id, username = %user.username, "User created");
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.state.read().await.users.clone())
    }

    async fn insert_session(&self, session: Session) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired());
        let purged = before - state.sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Expired sessions purged");
        }

        state.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.state.read().await.sessions.get(id).cloned())
    }

    async fn delete_session(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.state.write().await.sessions.remove(id).is_some())
    }

    async fn transfer(&self, transfer: TransferForCreate) -> Result<Transaction, StoreError> {
        let mut state = self.state.write().await;

        let sender = state
            .user_index(transfer.sender_id)
            .ok_or_else(|| StoreError::NotFound("Sender wallet not found".to_string()))?;
        if state.users[sender].balance < transfer.amount {
            return Err(StoreError::Rejected("Insufficient balance".to_string()));
        }

        let recipient = state
            .users
            .iter()
            .position(|u| u.wallet_address == transfer.recipient_address)
            .ok_or_else(|| StoreError::NotFound("Recipient not found".to_string()))?;
        if recipient == sender {
            return Err(StoreError::Rejected("Cannot transfer to your own wallet".to_string()));
        }

        let credited = state.users[recipient]
            .balance
            .checked_add(transfer.amount)
            .ok_or_else(|| StoreError::Rejected("Amount too large".to_string()))?;
        state.users[sender].balance -= transfer.amount;
        state.users[recipient].balance = credited;

        let receiver_id = state.users[recipient].id;
        let transaction = state.record(
            TransactionKind::Transfer,
            Some(transfer.sender_id),
            receiver_id,
            transfer.amount,
            transfer.description,
        );
        tracing::debug!(tx_id = transaction.id, sender_id = transfer.sender_id, receiver_id, "Transfer recorded");
        Ok(transaction)
    }

    async fn mint(&self, user_id: i64, amount: i64) -> Result<(Transaction, User), StoreError> {
        let mut state = self.state.write().await;

        let index = state
            .user_index(user_id)
            .ok_or_else(|| StoreError::NotFound("Treasury wallet not found".to_string()))?;
        let credited = state.users[index]
            .balance
            .checked_add(amount)
            .ok_or_else(|| StoreError::Rejected("Amount too large".to_string()))?;
        state.users[index].balance = credited;

        let transaction = state.record(TransactionKind::Mint, None, user_id, amount, "Token minting".to_string());
        Ok((transaction, state.users[index].clone()))
    }

    async fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .transactions
            .iter()
            .rev()
            .filter(|t| t.sender_id == Some(user_id) || t.receiver_id == user_id)
            .cloned()
            .collect())
    }
}
