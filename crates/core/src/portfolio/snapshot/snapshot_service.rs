use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, error, info};

use super::snapshot_model::{CaptureSummary, NewSnapshot, PortfolioSnapshot};
use super::snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
use crate::constants::DECIMAL_PRECISION;
use crate::errors::Result;
use crate::portfolio::holdings::calculate_holdings;
use crate::portfolio::performance::{market_value, DailyPerformancePoint, HoldingValuation};
use crate::quotes::{PriceCacheServiceTrait, PriceSource};
use crate::transactions::TransactionRepositoryTrait;
use crate::users::UserRepositoryTrait;
use crate::utils::time_utils::valuation_date_today;

pub struct SnapshotService {
    repository: Arc<dyn SnapshotRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    price_cache: Arc<dyn PriceCacheServiceTrait>,
}

impl SnapshotService {
    pub fn new(
        repository: Arc<dyn SnapshotRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        price_cache: Arc<dyn PriceCacheServiceTrait>,
    ) -> Self {
        Self {
            repository,
            user_repository,
            transaction_repository,
            price_cache,
        }
    }

    /// Values today's open holdings, live price first, then the latest cached
    /// close, then average cost.
    async fn value_current_holdings(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Option<DailyPerformancePoint>> {
        let transactions = self.transaction_repository.list_by_user(user_id)?;
        if transactions.is_empty() {
            return Ok(None);
        }

        let mut valuations = Vec::new();
        for holding in calculate_holdings(&transactions, Some(today)) {
            let live = self.price_cache.current_price(&holding.symbol).await?;
            let (price, price_source) = match live {
                Some(found) => found,
                None => (holding.average_cost, PriceSource::AverageCost),
            };
            valuations.push(HoldingValuation {
                market_value: market_value(&holding.symbol, holding.total_shares, price),
                total_cost: holding.total_cost.round_dp(DECIMAL_PRECISION),
                shares: holding.total_shares,
                symbol: holding.symbol,
                price,
                price_source,
            });
        }
        Ok(Some(DailyPerformancePoint::from_valuations(today, valuations)))
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn save_snapshot(&self, new_snapshot: NewSnapshot) -> Result<PortfolioSnapshot> {
        self.save_snapshot_on(new_snapshot, valuation_date_today())
            .await
    }

    async fn save_snapshot_on(
        &self,
        new_snapshot: NewSnapshot,
        snapshot_date: NaiveDate,
    ) -> Result<PortfolioSnapshot> {
        let new_snapshot = new_snapshot.validate()?;
        self.user_repository.get_by_id(&new_snapshot.user_id)?;

        let snapshot = new_snapshot.into_snapshot(snapshot_date, Utc::now().naive_utc());
        debug!(
            "Saving snapshot {} (value {}, cost {})",
            snapshot.id, snapshot.total_value, snapshot.total_cost
        );
        self.repository.upsert_snapshot(snapshot).await
    }

    fn list_snapshots(
        &self,
        user_id: &str,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>> {
        self.repository.list_snapshots_since(user_id, since)
    }

    async fn capture_snapshot(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>> {
        self.user_repository.get_by_id(user_id)?;
        let today = valuation_date_today();

        let Some(point) = self.value_current_holdings(user_id, today).await? else {
            debug!("No transactions for {}, skipping snapshot", user_id);
            return Ok(None);
        };

        let new_snapshot = NewSnapshot {
            user_id: user_id.to_string(),
            total_value: point.portfolio_value,
            total_cost: point.portfolio_cost,
            daily_return: point.return_pct,
            portfolio_data: serde_json::to_value(&point.holdings)?,
        };
        self.save_snapshot_on(new_snapshot, today).await.map(Some)
    }

    async fn capture_all_snapshots(&self) -> Result<CaptureSummary> {
        let mut summary = CaptureSummary::default();
        for user in self.user_repository.list()? {
            match self.capture_snapshot(&user.id).await {
                Ok(Some(_)) => summary.captured += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Snapshot capture for {} failed: {}", user.id, e);
                    summary.failed += 1;
                }
            }
        }
        info!(
            "Snapshot capture: {} captured, {} skipped, {} failed",
            summary.captured, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}
