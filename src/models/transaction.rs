use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the transactions table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RewardTransaction {
    pub id: Uuid,
    pub user_id: String,
    pub to_address: String,
    pub status: String,
    pub token_symbol: String,
    /// Decimal string as stored; parsed during aggregation.
    pub amount: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// The two fields the wallet aggregation reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TransactionAmount {
    pub amount: String,
    pub token_symbol: String,
}

impl TransactionAmount {
    pub fn new(amount: impl Into<String>, token_symbol: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            token_symbol: token_symbol.into(),
        }
    }
}

impl From<RewardTransaction> for TransactionAmount {
    fn from(tx: RewardTransaction) -> Self {
        Self {
            amount: tx.amount,
            token_symbol: tx.token_symbol,
        }
    }
}

/// Payload of the insert notification emitted by the transactions trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInserted {
    pub id: Option<Uuid>,
    pub to_address: String,
}
