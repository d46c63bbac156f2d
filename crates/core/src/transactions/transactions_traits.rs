use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction};
use crate::errors::Result;

/// Trait for transaction ledger storage
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// All transactions of a user in replay order (date, then id).
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>>;
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    /// Deletes the transaction only if `user_id` owns it. Returns rows deleted.
    async fn delete_for_user(&self, user_id: &str, transaction_id: i64) -> Result<usize>;
}

/// Trait for transaction ledger operations
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn record_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;
    async fn delete_transaction(&self, user_id: &str, transaction_id: i64) -> Result<()>;
}
