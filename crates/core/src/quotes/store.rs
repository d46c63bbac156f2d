//! Historical price storage trait.
//!
//! The price table is a shared, ever-growing store. Everything that reads or
//! fills it does so through [`PriceStore`], so the reconstructor and the
//! backfill policy can run against an in-memory double in tests.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::HistoricalPrice;
use crate::errors::Result;

/// Storage interface for cached daily prices.
///
/// All `symbol` arguments are resolved market symbols.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Most recent cached row with `price_date <= date`.
    fn get_price_on_or_before(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<HistoricalPrice>>;

    /// Cached rows in `[start, end]`, ascending by date.
    fn get_prices_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoricalPrice>>;

    /// Earliest and latest cached dates in `[start, end]`, if any row exists.
    fn get_date_bounds_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<(NaiveDate, NaiveDate)>>;

    /// Inserts rows, silently skipping any (symbol, date) already present.
    /// Returns the number of rows actually inserted.
    async fn insert_prices_ignore_existing(&self, prices: Vec<HistoricalPrice>) -> Result<usize>;
}
