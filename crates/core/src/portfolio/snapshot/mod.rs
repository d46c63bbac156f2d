//! Portfolio snapshots - one stored valuation per user per day.

mod snapshot_model;
mod snapshot_service;
mod snapshot_traits;

pub use snapshot_model::{CaptureSummary, NewSnapshot, PortfolioSnapshot};
pub use snapshot_service::SnapshotService;
pub use snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
