use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::transactions_model::{NewTransaction, Transaction};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::errors::{Error, Result};
use crate::users::UserRepositoryTrait;

/// Service for the append-only transaction ledger
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            user_repository,
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn record_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let new_transaction = new_transaction.validate()?;
        // Unknown users surface as NotFound rather than a foreign key failure
        self.user_repository.get_by_id(&new_transaction.user_id)?;

        debug!(
            "Recording {} {} {} @ {} on {} for {}",
            new_transaction.side,
            new_transaction.shares,
            new_transaction.symbol,
            new_transaction.price_per_share,
            new_transaction.transaction_date,
            new_transaction.user_id
        );
        self.repository.create(new_transaction).await
    }

    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_by_user(user_id)
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: i64) -> Result<()> {
        let deleted = self
            .repository
            .delete_for_user(user_id, transaction_id)
            .await?;
        if deleted == 0 {
            return Err(Error::not_found(format!(
                "transaction {} for user {}",
                transaction_id, user_id
            )));
        }
        info!("Deleted transaction {} for {}", transaction_id, user_id);
        Ok(())
    }
}
