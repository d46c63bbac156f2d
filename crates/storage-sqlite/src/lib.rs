//! SQLite storage implementation for Tradeboard.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `tradeboard-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users, transactions, cached prices and snapshots
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool. Every write goes through the single writer
//! actor ([`WriteHandle`]) and runs inside an immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod market_data;
pub mod portfolio;
pub mod transactions;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use market_data::PriceRepository;
pub use portfolio::snapshot::SnapshotRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

// Re-export from tradeboard-core for convenience
pub use tradeboard_core::errors::{DatabaseError, Error, Result};
