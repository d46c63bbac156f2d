use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};

use super::performance_model::{market_value, DailyPerformancePoint, HoldingValuation};
use crate::constants::{DECIMAL_PRECISION, MAX_SERIES_DAYS};
use crate::errors::{Error, Result};
use crate::portfolio::holdings::{calculate_positions, HoldingsCalculator};
use crate::quotes::{
    BackfillOutcome, PriceCacheServiceTrait, PriceSource, PriceTimeline, RangeRequest,
};
use crate::transactions::{Transaction, TransactionRepositoryTrait, TransactionSide};
use crate::utils::time_utils::get_days_between;

/// Trait for daily performance reconstruction
#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// One point per calendar day in `[start, end]`, ascending. Backfills the
    /// price cache once for every symbol held in the window, then values each
    /// day. Empty when the user has no transactions or `start > end`.
    async fn get_daily_performance(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPerformancePoint>>;

    /// Values each day of `[start, end]` from the ledger and the cache as they
    /// are. Never fetches.
    fn build_series(
        &self,
        transactions: &[Transaction],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPerformancePoint>>;
}

/// Symbols with an open position at any point in `[start, end]`: those open
/// at `start` plus anything bought during the window.
pub fn symbols_held_in_window(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> BTreeSet<String> {
    if start > end {
        return BTreeSet::new();
    }

    let mut symbols: BTreeSet<String> = calculate_positions(transactions, Some(start))
        .into_iter()
        .filter(|(_, position)| position.is_open())
        .map(|(symbol, _)| symbol)
        .collect();
    symbols.extend(
        transactions
            .iter()
            .filter(|t| {
                t.side == TransactionSide::Buy
                    && t.transaction_date > start
                    && t.transaction_date <= end
            })
            .map(|t| t.symbol.clone()),
    );
    symbols
}

/// Backfill requests covering every symbol held in `[start, end]`.
pub fn backfill_requests(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<RangeRequest> {
    symbols_held_in_window(transactions, start, end)
        .into_iter()
        .map(|symbol| RangeRequest::new(symbol, start, end))
        .collect()
}

pub struct PerformanceService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    price_cache: Arc<dyn PriceCacheServiceTrait>,
}

impl PerformanceService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        price_cache: Arc<dyn PriceCacheServiceTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            price_cache,
        }
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    async fn get_daily_performance(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPerformancePoint>> {
        if start > end {
            return Ok(Vec::new());
        }
        if (end - start).num_days() > MAX_SERIES_DAYS {
            return Err(Error::invalid_input(format!(
                "Date range {} to {} exceeds {} days",
                start, end, MAX_SERIES_DAYS
            )));
        }

        let transactions = self.transaction_repository.list_by_user(user_id)?;
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        let outcomes = self
            .price_cache
            .ensure_ranges(backfill_requests(&transactions, start, end))
            .await?;
        let failed: Vec<&String> = outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, BackfillOutcome::FetchFailed { .. }))
            .map(|(symbol, _)| symbol)
            .collect();
        if !failed.is_empty() {
            warn!(
                "Reconstructing {} [{}, {}] without fresh prices for {:?}",
                user_id, start, end, failed
            );
        }

        self.build_series(&transactions, start, end)
    }

    fn build_series(
        &self,
        transactions: &[Transaction],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPerformancePoint>> {
        let days = get_days_between(start, end);
        if days.is_empty() || transactions.is_empty() {
            return Ok(Vec::new());
        }

        let mut calculator = HoldingsCalculator::new(transactions);
        let mut timelines: HashMap<String, PriceTimeline> = HashMap::new();
        let mut series = Vec::with_capacity(days.len());

        for day in days {
            let positions = calculator.advance_to(day);
            let mut valuations = Vec::new();

            for (symbol, position) in positions.iter().filter(|(_, p)| p.is_open()) {
                if !timelines.contains_key(symbol) {
                    let timeline = self.price_cache.load_timeline(symbol, start, end)?;
                    timelines.insert(symbol.clone(), timeline);
                }

                let (price, price_source) = match timelines
                    .get(symbol)
                    .and_then(|timeline| timeline.close_on_or_before(day))
                {
                    Some(close) => (close, PriceSource::Cache),
                    None => (position.average_cost(), PriceSource::AverageCost),
                };

                valuations.push(HoldingValuation {
                    symbol: symbol.clone(),
                    shares: position.total_shares,
                    price,
                    market_value: market_value(symbol, position.total_shares, price),
                    total_cost: position.total_cost.round_dp(DECIMAL_PRECISION),
                    price_source,
                });
            }

            series.push(DailyPerformancePoint::from_valuations(day, valuations));
        }

        debug!(
            "Built {} daily points [{}, {}] over {} symbols",
            series.len(),
            start,
            end,
            timelines.len()
        );
        Ok(series)
    }
}
