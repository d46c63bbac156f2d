//! On-demand backfill of the historical price cache.
//!
//! `ensure_range` is best effort. Provider failures come back as a
//! `Result<PriceSeries, MarketDataError>`, are matched here, logged and turned
//! into [`BackfillOutcome::FetchFailed`]. Callers then value positions from
//! whatever is cached, or at average cost. Storage failures still propagate.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use tradeboard_market_data::{
    resolve_market_symbol, ChartRange, MarketDataError, MarketDataProvider, PriceSeries,
    RetryClass,
};

use super::model::{
    BackfillOutcome, CoveragePolicy, HistoricalPrice, PriceSource, PriceTimeline, RangeRequest,
};
use super::store::PriceStore;
use crate::constants::{
    DEFAULT_BACKFILL_CONCURRENCY, DEFAULT_EDGE_TOLERANCE_DAYS, PRICE_FETCH_BUFFER_DAYS,
};
use crate::errors::Result;
use crate::utils::time_utils::valuation_date_today;

#[derive(Debug, Clone)]
pub struct PriceCacheConfig {
    pub coverage_policy: CoveragePolicy,
    pub edge_tolerance_days: i64,
    /// Upper bound on concurrent fetches; also capped by the provider's rate limit.
    pub max_concurrency: usize,
    pub fetch_buffer_days: i64,
}

impl Default for PriceCacheConfig {
    fn default() -> Self {
        Self {
            coverage_policy: CoveragePolicy::default(),
            edge_tolerance_days: DEFAULT_EDGE_TOLERANCE_DAYS,
            max_concurrency: DEFAULT_BACKFILL_CONCURRENCY,
            fetch_buffer_days: PRICE_FETCH_BUFFER_DAYS,
        }
    }
}

/// Trait for price cache operations
#[async_trait]
pub trait PriceCacheServiceTrait: Send + Sync {
    /// Best-effort guarantee that closes for `symbol` in `[start, end]` are cached.
    /// `symbol` may be a display label; it is resolved before any lookup.
    async fn ensure_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BackfillOutcome>;

    /// Runs `ensure_range` for many requests. Requests for the same market
    /// symbol are merged into one window. Keyed by market symbol.
    async fn ensure_ranges(
        &self,
        requests: Vec<RangeRequest>,
    ) -> Result<HashMap<String, BackfillOutcome>>;

    /// Cached closes for `symbol` covering `[start, end]`, including the last
    /// close before `start` so the first days can carry forward.
    fn load_timeline(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceTimeline>;

    /// Latest cached close on or before `as_of`. Never fetches.
    fn latest_price(&self, symbol: &str, as_of: NaiveDate) -> Result<Option<Decimal>>;

    /// Live price if the provider answers, else the latest cached close.
    async fn current_price(&self, symbol: &str) -> Result<Option<(Decimal, PriceSource)>>;
}

pub struct PriceCacheService {
    store: Arc<dyn PriceStore>,
    provider: Arc<dyn MarketDataProvider>,
    config: PriceCacheConfig,
}

impl PriceCacheService {
    pub fn new(
        store: Arc<dyn PriceStore>,
        provider: Arc<dyn MarketDataProvider>,
        mut config: PriceCacheConfig,
    ) -> Self {
        let provider_limit = provider.rate_limit().max_concurrency.max(1);
        config.max_concurrency = config.max_concurrency.clamp(1, provider_limit);
        Self {
            store,
            provider,
            config,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.config.max_concurrency
    }

    fn is_covered(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<bool> {
        let bounds = self.store.get_date_bounds_in_range(symbol, start, end)?;
        Ok(match (self.config.coverage_policy, bounds) {
            (_, None) => false,
            (CoveragePolicy::AnyRow, Some(_)) => true,
            (CoveragePolicy::Edges, Some((first, last))) => {
                let tolerance = self.config.edge_tolerance_days;
                (first - start).num_days() <= tolerance && (end - last).num_days() <= tolerance
            }
        })
    }

    async fn fetch_series(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> std::result::Result<PriceSeries, MarketDataError> {
        let error = match self.provider.get_price_series(symbol, range).await {
            Ok(series) => return Ok(series),
            Err(e) => e,
        };

        match error.retry_class() {
            RetryClass::Never => return Err(error),
            RetryClass::Once => {}
            RetryClass::WithBackoff => {
                tokio::time::sleep(self.provider.rate_limit().min_delay * 2).await;
            }
        }
        debug!("Retrying {} {} after: {}", symbol, range, error);
        self.provider.get_price_series(symbol, range).await
    }

    async fn ensure_market_range(
        &self,
        market_symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BackfillOutcome> {
        let today = valuation_date_today();
        // Nothing after today can be cached yet
        let end = end.min(today);
        if start > end {
            return Ok(BackfillOutcome::EmptyWindow);
        }

        if self.is_covered(market_symbol, start, end)? {
            debug!(
                "Prices for {} [{}, {}] already cached",
                market_symbol, start, end
            );
            return Ok(BackfillOutcome::AlreadyCovered);
        }

        let range = ChartRange::covering_since(start, today, self.config.fetch_buffer_days);
        match self.fetch_series(market_symbol, range).await {
            Ok(series) => {
                let rows: Vec<HistoricalPrice> = series
                    .bars
                    .iter()
                    .map(|bar| HistoricalPrice::from_bar(market_symbol, bar))
                    .collect();
                let inserted = self.store.insert_prices_ignore_existing(rows).await?;
                info!(
                    "Backfilled {} ({}): {} bars received, {} new",
                    market_symbol,
                    range,
                    series.bars.len(),
                    inserted
                );
                Ok(BackfillOutcome::Fetched { inserted })
            }
            Err(e) => {
                warn!(
                    "Price backfill for {} [{}, {}] failed, using cached data: {}",
                    market_symbol, start, end, e
                );
                Ok(BackfillOutcome::FetchFailed {
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl PriceCacheServiceTrait for PriceCacheService {
    async fn ensure_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BackfillOutcome> {
        let market_symbol = resolve_market_symbol(symbol);
        self.ensure_market_range(&market_symbol, start, end).await
    }

    async fn ensure_ranges(
        &self,
        requests: Vec<RangeRequest>,
    ) -> Result<HashMap<String, BackfillOutcome>> {
        let mut windows: BTreeMap<String, (NaiveDate, NaiveDate)> = BTreeMap::new();
        for request in requests.into_iter().filter(|r| r.start <= r.end) {
            windows
                .entry(resolve_market_symbol(&request.symbol))
                .and_modify(|(start, end)| {
                    *start = (*start).min(request.start);
                    *end = (*end).max(request.end);
                })
                .or_insert((request.start, request.end));
        }

        if windows.is_empty() {
            return Ok(HashMap::new());
        }
        debug!(
            "Ensuring price ranges for {} symbols ({} at a time)",
            windows.len(),
            self.config.max_concurrency
        );

        let results: Vec<(String, Result<BackfillOutcome>)> = stream::iter(windows)
            .map(|(symbol, (start, end))| async move {
                let outcome = self.ensure_market_range(&symbol, start, end).await;
                (symbol, outcome)
            })
            .buffer_unordered(self.config.max_concurrency)
            .collect()
            .await;

        let mut outcomes = HashMap::with_capacity(results.len());
        for (symbol, outcome) in results {
            outcomes.insert(symbol, outcome?);
        }
        Ok(outcomes)
    }

    fn load_timeline(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTimeline> {
        let market_symbol = resolve_market_symbol(symbol);
        let seed = self.store.get_price_on_or_before(&market_symbol, start)?;
        let in_range = if start <= end {
            self.store.get_prices_in_range(&market_symbol, start, end)?
        } else {
            Vec::new()
        };
        Ok(PriceTimeline::from_prices(seed.into_iter().chain(in_range)))
    }

    fn latest_price(&self, symbol: &str, as_of: NaiveDate) -> Result<Option<Decimal>> {
        let market_symbol = resolve_market_symbol(symbol);
        Ok(self
            .store
            .get_price_on_or_before(&market_symbol, as_of)?
            .map(|p| p.close))
    }

    async fn current_price(&self, symbol: &str) -> Result<Option<(Decimal, PriceSource)>> {
        let market_symbol = resolve_market_symbol(symbol);
        match self.provider.get_latest_quote(&market_symbol).await {
            Ok(quote) => return Ok(Some((quote.price, PriceSource::Live))),
            Err(e) => warn!(
                "Live quote for {} unavailable, falling back to cache: {}",
                market_symbol, e
            ),
        }

        let cached = self.latest_price(&market_symbol, valuation_date_today())?;
        Ok(cached.map(|close| (close, PriceSource::Cache)))
    }
}
