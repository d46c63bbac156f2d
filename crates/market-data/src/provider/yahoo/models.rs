//! Yahoo Finance chart API response models.
//!
//! Shape of `/v8/finance/chart/{symbol}?range=..&interval=1d`. Indicator
//! arrays are aligned with `timestamp` and may contain nulls for days
//! where the exchange published no data.

use serde::Deserialize;

/// Main response wrapper for the chart API
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChart,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    pub result: Option<Vec<YahooChartResult>>,
    pub error: Option<YahooChartError>,
}

/// Error object returned alongside a null result, e.g. for delisted symbols
#[derive(Debug, Deserialize)]
pub struct YahooChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    pub meta: YahooChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooChartMeta {
    pub currency: Option<String>,
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    /// Exchange offset from UTC in seconds; used to place bars on the exchange's calendar day
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooQuoteIndicator>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YahooQuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}
