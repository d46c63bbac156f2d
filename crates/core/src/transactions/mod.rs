//! Transaction ledger - domain models, services, and traits.

mod transactions_model;
mod transactions_service;
mod transactions_traits;

pub use transactions_model::{sort_for_replay, NewTransaction, Transaction, TransactionSide};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
