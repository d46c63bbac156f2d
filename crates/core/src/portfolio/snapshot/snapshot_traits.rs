//! Repository and service traits for portfolio snapshots.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::snapshot_model::{CaptureSummary, NewSnapshot, PortfolioSnapshot};
use crate::errors::Result;

/// Repository trait for portfolio snapshots.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Inserts or replaces the snapshot for `(user_id, snapshot_date)` in one
    /// statement. `created_at` of an existing row is kept.
    async fn upsert_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot>;

    /// Snapshots on or after `since` (all when `None`), ascending by date.
    fn list_snapshots_since(
        &self,
        user_id: &str,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>>;
}

/// Trait for snapshot operations.
#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Saves today's snapshot, replacing any earlier one from today.
    async fn save_snapshot(&self, new_snapshot: NewSnapshot) -> Result<PortfolioSnapshot>;

    async fn save_snapshot_on(
        &self,
        new_snapshot: NewSnapshot,
        snapshot_date: NaiveDate,
    ) -> Result<PortfolioSnapshot>;

    fn list_snapshots(
        &self,
        user_id: &str,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>>;

    /// Values current holdings at live prices and saves today's snapshot.
    /// `None` when the user has no transactions.
    async fn capture_snapshot(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>>;

    /// Runs [`capture_snapshot`](Self::capture_snapshot) for every registered user.
    async fn capture_all_snapshots(&self) -> Result<CaptureSummary>;
}
