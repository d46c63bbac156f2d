//! SQLite storage implementation for the transaction ledger.

mod model;
mod repository;

pub use model::{NewTransactionDB, TransactionDB};
pub use repository::TransactionRepository;

// Re-export trait from core for convenience
pub use tradeboard_core::transactions::TransactionRepositoryTrait;
