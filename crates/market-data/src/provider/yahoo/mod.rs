//! Yahoo Finance market data provider.
//!
//! Uses the public v8 chart endpoint, which serves daily OHLCV history for:
//! - Equities/ETFs (e.g., AAPL, GLD)
//! - Cryptocurrencies (e.g., BTC-USD)
//! - Foreign exchange rates (e.g., EURUSD=X)

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use num_traits::FromPrimitive;
use reqwest::{header, StatusCode};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{ChartRange, DailyBar, PriceSeries};
use crate::provider::{MarketDataProvider, RateLimit};

use models::{YahooChartResponse, YahooChartResult};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance chart provider.
///
/// The base URL is configurable so that a compatible mirror (or a local stub in
/// tests) can stand in for Yahoo.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    /// Create a provider whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str, range: ChartRange) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d&includePrePost=false",
            self.base_url,
            encode(symbol),
            range.as_str()
        )
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<YahooChartResult, MarketDataError> {
        let url = self.chart_url(symbol, range);
        debug!("Fetching Yahoo chart {} ({})", symbol, range);

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} for {}", status, symbol),
            });
        }

        let body: YahooChartResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                request_error(e)
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse chart response: {}", e),
                }
            }
        })?;

        first_result(symbol, body)
    }
}

fn request_error(e: reqwest::Error) -> MarketDataError {
    if e.is_timeout() {
        MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        MarketDataError::Network(e)
    }
}

fn first_result(
    symbol: &str,
    body: YahooChartResponse,
) -> Result<YahooChartResult, MarketDataError> {
    if let Some(error) = body.chart.error {
        let description = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("{}: {}", symbol, description),
        });
    }

    body.chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value
        .filter(|v| v.is_finite())
        .and_then(Decimal::from_f64)
        .map(|d| d.normalize())
}

/// Turn a chart result into an ascending, date-unique series.
///
/// Days with a null or non-positive close are skipped. When two timestamps land
/// on the same exchange date (Yahoo appends the live session as an extra point)
/// the later one wins.
fn parse_series(symbol: &str, result: YahooChartResult) -> Result<PriceSeries, MarketDataError> {
    let indicator = result.indicators.quote.into_iter().next().unwrap_or_default();
    let column = |values: &Vec<Option<f64>>, i: usize| values.get(i).copied().flatten();

    let mut bars: Vec<DailyBar> = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let close = match to_decimal(column(&indicator.close, i)) {
            Some(close) if close > Decimal::ZERO => close,
            _ => continue,
        };

        let local = ts
            .checked_add(result.meta.gmtoffset)
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        let date: NaiveDate = match local {
            Some(dt) => dt.date_naive(),
            None => {
                warn!("Skipping invalid timestamp {} for {}", ts, symbol);
                continue;
            }
        };

        let bar = DailyBar {
            date,
            open: to_decimal(column(&indicator.open, i)),
            high: to_decimal(column(&indicator.high, i)),
            low: to_decimal(column(&indicator.low, i)),
            close,
            volume: to_decimal(column(&indicator.volume, i)),
        };

        match bars.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            Some(last) if last.date > bar.date => {
                return Err(MarketDataError::ValidationFailed {
                    message: format!("{}: timestamps are not ascending", symbol),
                });
            }
            _ => bars.push(bar),
        }
    }

    if bars.is_empty() {
        return Err(MarketDataError::NoDataForRange);
    }

    let meta = result.meta;
    Ok(PriceSeries {
        symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
        currency: meta.currency.unwrap_or_else(|| "USD".to_string()),
        bars,
        regular_market_price: to_decimal(meta.regular_market_price),
        previous_close: to_decimal(meta.previous_close.or(meta.chart_previous_close)),
    })
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 2000,
            max_concurrency: 10,
            min_delay: Duration::from_millis(50),
        }
    }

    async fn get_price_series(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<PriceSeries, MarketDataError> {
        let result = self.fetch_chart(symbol, range).await?;
        let series = parse_series(symbol, result)?;
        debug!(
            "Yahoo returned {} bars for {} ({})",
            series.bars.len(),
            symbol,
            range
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const AAPL_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "regularMarketPrice": 172.62,
                    "chartPreviousClose": 170.12,
                    "gmtoffset": -14400
                },
                "timestamp": [1710163800, 1710250200, 1710336600, 1710423000],
                "indicators": {
                    "quote": [{
                        "open": [172.94, 173.15, null, 172.91],
                        "high": [174.38, 174.03, null, 174.31],
                        "low": [172.05, 171.01, null, 172.05],
                        "close": [172.75, 173.23, null, 173.0],
                        "volume": [60139500, 59825400, null, 52488700]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    fn parse(json: &str) -> Result<PriceSeries, MarketDataError> {
        let body: YahooChartResponse = serde_json::from_str(json).unwrap();
        let result = first_result("AAPL", body)?;
        parse_series("AAPL", result)
    }

    #[test]
    fn test_parse_series_skips_null_days() {
        let series = parse(AAPL_CHART).unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.bars.len(), 3);
        let dates: Vec<String> = series.bars.iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-11", "2024-03-12", "2024-03-14"]);
        assert_eq!(series.bars[0].close, dec!(172.75));
        assert_eq!(series.bars[2].volume, Some(dec!(52488700)));
        assert_eq!(series.regular_market_price, Some(dec!(172.62)));
        assert_eq!(series.previous_close, Some(dec!(170.12)));
    }

    #[test]
    fn test_parse_series_uses_exchange_offset_for_dates() {
        // 2024-03-11 23:30 UTC is still the 11th in New York but the 12th in Tokyo
        let json = r#"{"chart":{"result":[{"meta":{"gmtoffset":32400},
            "timestamp":[1710199800],
            "indicators":{"quote":[{"close":[100.0]}]}}],"error":null}}"#;
        let series = parse(json).unwrap();
        assert_eq!(series.bars[0].date.to_string(), "2024-03-12");
        assert_eq!(series.currency, "USD");
    }

    #[test]
    fn test_parse_series_keeps_last_point_per_date() {
        let json = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "timestamp":[1710115200, 1710158400],
            "indicators":{"quote":[{"close":[10.0, 11.5]}]}}],"error":null}}"#;
        let series = parse(json).unwrap();
        assert_eq!(series.bars.len(), 1);
        assert_eq!(series.bars[0].close, dec!(11.5));
    }

    #[test]
    fn test_parse_series_skips_out_of_range_timestamps() {
        let json = r#"{"chart":{"result":[{"meta":{"gmtoffset":3600},
            "timestamp":[1710115200, 9000000000000000000, 9223372036854775807],
            "indicators":{"quote":[{"close":[10.0, 11.0, 12.0]}]}}],"error":null}}"#;
        let series = parse(json).unwrap();
        assert_eq!(series.bars.len(), 1);
        assert_eq!(series.bars[0].close, dec!(10));

        let only_bad = r#"{"chart":{"result":[{"meta":{"gmtoffset":3600},
            "timestamp":[9223372036854775807],
            "indicators":{"quote":[{"close":[12.0]}]}}],"error":null}}"#;
        assert!(matches!(parse(only_bad), Err(MarketDataError::NoDataForRange)));
    }

    #[test]
    fn test_all_null_closes_is_no_data() {
        let json = r#"{"chart":{"result":[{"meta":{},
            "timestamp":[1710163800],
            "indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#;
        assert!(matches!(parse(json), Err(MarketDataError::NoDataForRange)));
    }

    #[test]
    fn test_error_payload_is_provider_error() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found",
            "description":"No data found, symbol may be delisted"}}}"#;
        match parse(json) {
            Err(MarketDataError::ProviderError { message, .. }) => {
                assert!(message.contains("delisted"));
            }
            other => panic!("unexpected result: {:?}", other.map(|s| s.bars.len())),
        }
    }

    #[test]
    fn test_chart_url() {
        let provider =
            YahooProvider::new("http://localhost:9999/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.chart_url("BTC-USD", ChartRange::OneYear),
            "http://localhost:9999/v8/finance/chart/BTC-USD?range=1y&interval=1d&includePrePost=false"
        );
        assert_eq!(
            provider.chart_url("^GSPC", ChartRange::FiveDays),
            "http://localhost:9999/v8/finance/chart/%5EGSPC?range=5d&interval=1d&includePrePost=false"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_soft() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let provider = YahooProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = provider.get_price_series("AAPL", ChartRange::FiveDays).await;
        assert!(matches!(
            result,
            Err(MarketDataError::Network(_)) | Err(MarketDataError::Timeout { .. })
        ));
    }
}
