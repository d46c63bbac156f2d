//! SQLite storage implementation for portfolio snapshots.

mod model;
mod repository;

pub use model::PortfolioSnapshotDB;
pub use repository::SnapshotRepository;

// Re-export trait from core for convenience
pub use tradeboard_core::portfolio::snapshot::SnapshotRepositoryTrait;
