use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::holdings_calculator::calculate_holdings;
use super::holdings_model::Holding;
use crate::errors::Result;
use crate::transactions::TransactionRepositoryTrait;

/// Trait for holdings operations
pub trait HoldingsServiceTrait: Send + Sync {
    /// Open positions as of `as_of` (latest when `None`), recomputed from the full ledger.
    fn get_holdings(&self, user_id: &str, as_of: Option<NaiveDate>) -> Result<Vec<Holding>>;
}

pub struct HoldingsService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl HoldingsService {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self {
            transaction_repository,
        }
    }
}

impl HoldingsServiceTrait for HoldingsService {
    fn get_holdings(&self, user_id: &str, as_of: Option<NaiveDate>) -> Result<Vec<Holding>> {
        let transactions = self.transaction_repository.list_by_user(user_id)?;
        let holdings = calculate_holdings(&transactions, as_of);
        debug!(
            "{} open holdings for {} from {} transactions",
            holdings.len(),
            user_id,
            transactions.len()
        );
        Ok(holdings)
    }
}
