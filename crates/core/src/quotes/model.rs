use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeboard_market_data::DailyBar;

/// One cached daily bar, keyed by (market symbol, date).
///
/// Rows are written once and never updated: the first fetched value for a
/// date is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPrice {
    pub symbol: String,
    pub price_date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<Decimal>,
}

impl HistoricalPrice {
    pub fn from_bar(symbol: &str, bar: &DailyBar) -> Self {
        Self {
            symbol: symbol.to_string(),
            price_date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// How the cache decides that a window needs no fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoveragePolicy {
    /// Any cached row inside the window counts as covered. Cheap, but a
    /// partial earlier fetch can leave gaps that are never filled.
    #[default]
    AnyRow,
    /// Cached rows must reach both ends of the window, within
    /// `edge_tolerance_days` to allow for weekends and holidays.
    Edges,
}

impl std::str::FromStr for CoveragePolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "any_row" | "anyrow" => Ok(CoveragePolicy::AnyRow),
            "edges" => Ok(CoveragePolicy::Edges),
            other => Err(crate::Error::invalid_input(format!(
                "Unknown coverage policy '{}'",
                other
            ))),
        }
    }
}

/// Result of one `ensure_range` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillOutcome {
    /// Cache already covered the window; nothing fetched.
    AlreadyCovered,
    /// Window lies entirely in the future; nothing to fetch.
    EmptyWindow,
    /// Series fetched; `inserted` rows were new.
    Fetched { inserted: usize },
    /// Fetch failed and the cache was left as it was.
    FetchFailed { reason: String },
}

/// Where a valuation price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    /// Provider's live quote
    Live,
    /// Most recent cached close on or before the valuation date
    Cache,
    /// No price known; valued at the position's average cost
    AverageCost,
}

/// A symbol and inclusive date window to backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RangeRequest {
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }
}

/// In-memory closes for one symbol, answering carry-forward lookups.
#[derive(Debug, Clone, Default)]
pub struct PriceTimeline {
    closes: BTreeMap<NaiveDate, Decimal>,
}

impl PriceTimeline {
    pub fn from_prices(prices: impl IntoIterator<Item = HistoricalPrice>) -> Self {
        Self {
            closes: prices.into_iter().map(|p| (p.price_date, p.close)).collect(),
        }
    }

    /// Close of the most recent cached day on or before `date`.
    pub fn close_on_or_before(&self, date: NaiveDate) -> Option<Decimal> {
        self.closes.range(..=date).next_back().map(|(_, close)| *close)
    }
}
