//! Tradeboard Core - Domain entities, services, and traits.
//!
//! This crate contains the valuation and performance logic for Tradeboard:
//! the transaction ledger, average-cost holdings, the historical price cache,
//! daily performance reconstruction, the leaderboard and portfolio snapshots.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod quotes;
pub mod transactions;
pub mod users;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export common types from the portfolio module
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
