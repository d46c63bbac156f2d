//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::MarketDataError;
use crate::models::{ChartRange, PriceSeries, Quote};

use super::capabilities::RateLimit;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new daily chart source. Symbols
/// passed in are already resolved market symbols (e.g. "BTC-USD", not "BTC").
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tradeboard_market_data::{
///     ChartRange, MarketDataError, MarketDataProvider, PriceSeries, RateLimit,
/// };
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     async fn get_price_series(
///         &self,
///         symbol: &str,
///         range: ChartRange,
///     ) -> Result<PriceSeries, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch the daily price series for `symbol` over `range`.
    ///
    /// Bars must be ordered by date ascending with at most one bar per date.
    /// An empty series is reported as [`MarketDataError::NoDataForRange`].
    async fn get_price_series(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<PriceSeries, MarketDataError>;

    /// Fetch the latest quote for `symbol`.
    ///
    /// Default implementation reads the metadata of a short daily series.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let series = self.get_price_series(symbol, ChartRange::FiveDays).await?;
        let price = series
            .current_price()
            .ok_or(MarketDataError::NoDataForRange)?;

        Ok(Quote {
            symbol: series.symbol,
            timestamp: Utc::now(),
            price,
            previous_close: series.previous_close,
            currency: series.currency,
            source: self.id().to_string(),
        })
    }
}
