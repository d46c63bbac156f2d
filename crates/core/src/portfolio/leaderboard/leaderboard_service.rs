use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};

use super::leaderboard_model::RankedUser;
use crate::constants::{MAX_LEADERBOARD_WINDOW_DAYS, MIN_LEADERBOARD_WINDOW_DAYS};
use crate::errors::Result;
use crate::portfolio::performance::{backfill_requests, PerformanceServiceTrait};
use crate::quotes::{BackfillOutcome, PriceCacheServiceTrait, RangeRequest};
use crate::transactions::{Transaction, TransactionRepositoryTrait};
use crate::users::{User, UserRepositoryTrait};
use crate::utils::time_utils::{days_before, valuation_date_today};

/// Trait for leaderboard operations
#[async_trait]
pub trait LeaderboardServiceTrait: Send + Sync {
    /// Ranks opted-in users by return over the trailing `window_days`, ending today.
    async fn get_leaderboard(&self, window_days: i64) -> Result<Vec<RankedUser>>;

    /// Same as [`get_leaderboard`](Self::get_leaderboard) with an explicit "today".
    async fn get_leaderboard_as_of(
        &self,
        window_days: i64,
        today: NaiveDate,
    ) -> Result<Vec<RankedUser>>;
}

struct Entrant {
    user: User,
    transactions: Vec<Transaction>,
    start: NaiveDate,
}

pub struct LeaderboardService {
    user_repository: Arc<dyn UserRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    performance_service: Arc<dyn PerformanceServiceTrait>,
    price_cache: Arc<dyn PriceCacheServiceTrait>,
}

impl LeaderboardService {
    pub fn new(
        user_repository: Arc<dyn UserRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        performance_service: Arc<dyn PerformanceServiceTrait>,
        price_cache: Arc<dyn PriceCacheServiceTrait>,
    ) -> Self {
        Self {
            user_repository,
            transaction_repository,
            performance_service,
            price_cache,
        }
    }

    /// Opted-in users with at least one transaction on or before `today`,
    /// each with their window start.
    fn entrants(&self, window_floor: NaiveDate, today: NaiveDate) -> Result<Vec<Entrant>> {
        let mut entrants = Vec::new();
        for user in self.user_repository.list_sharing()? {
            let transactions = self.transaction_repository.list_by_user(&user.id)?;
            let Some(first) = transactions.iter().map(|t| t.transaction_date).min() else {
                debug!("Leaderboard: {} has no transactions", user.id);
                continue;
            };

            let start = first.max(window_floor);
            if start > today {
                debug!("Leaderboard: {} has only future-dated transactions", user.id);
                continue;
            }
            entrants.push(Entrant {
                user,
                transactions,
                start,
            });
        }
        Ok(entrants)
    }
}

#[async_trait]
impl LeaderboardServiceTrait for LeaderboardService {
    async fn get_leaderboard(&self, window_days: i64) -> Result<Vec<RankedUser>> {
        self.get_leaderboard_as_of(window_days, valuation_date_today())
            .await
    }

    async fn get_leaderboard_as_of(
        &self,
        window_days: i64,
        today: NaiveDate,
    ) -> Result<Vec<RankedUser>> {
        let window_days =
            window_days.clamp(MIN_LEADERBOARD_WINDOW_DAYS, MAX_LEADERBOARD_WINDOW_DAYS);
        let entrants = self.entrants(days_before(today, window_days), today)?;

        // One bounded, concurrent backfill pass for every symbol any entrant held
        let requests: Vec<RangeRequest> = entrants
            .iter()
            .flat_map(|e| backfill_requests(&e.transactions, e.start, today))
            .collect();
        let outcomes = self.price_cache.ensure_ranges(requests).await?;
        let failed = outcomes
            .values()
            .filter(|o| matches!(o, BackfillOutcome::FetchFailed { .. }))
            .count();
        if failed > 0 {
            warn!(
                "Leaderboard built with {} of {} symbols lacking fresh prices",
                failed,
                outcomes.len()
            );
        }

        let mut ranked = Vec::with_capacity(entrants.len());
        for entrant in entrants {
            let series =
                self.performance_service
                    .build_series(&entrant.transactions, entrant.start, today)?;
            let Some(last) = series.last().cloned() else {
                continue;
            };

            let full = entrant.user.share_full_portfolio;
            let performance_series = if full {
                series
            } else {
                series.into_iter().map(|p| p.without_holdings()).collect()
            };

            ranked.push(RankedUser {
                rank: 0,
                user_id: entrant.user.id,
                display_name: entrant.user.display_name,
                current_return_pct: last.return_pct,
                current_value: last.portfolio_value,
                current_cost: last.portfolio_cost,
                window_start: entrant.start,
                window_end: today,
                shares_full_portfolio: full,
                performance_series,
            });
        }

        // Stable: ties keep user id order
        ranked.sort_by(|a, b| b.current_return_pct.cmp(&a.current_return_pct));
        for (index, entry) in ranked.iter_mut().enumerate() {
            entry.rank = index + 1;
        }

        info!(
            "Leaderboard for {} ({} day window): {} ranked users",
            today,
            window_days,
            ranked.len()
        );
        Ok(ranked)
    }
}
