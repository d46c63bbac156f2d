use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<Decimal>,
}

/// Daily price history for one market symbol as returned by a provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub currency: String,
    /// Bars in ascending date order, at most one per date.
    pub bars: Vec<DailyBar>,
    pub regular_market_price: Option<Decimal>,
    pub previous_close: Option<Decimal>,
}

impl PriceSeries {
    /// Live price from the series metadata, falling back to the previous close
    /// and then to the last bar.
    pub fn current_price(&self) -> Option<Decimal> {
        self.regular_market_price
            .or(self.previous_close)
            .or_else(|| self.bars.last().map(|b| b.close))
    }
}

/// Lookback ranges accepted by chart endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChartRange {
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    Max,
}

impl ChartRange {
    const ORDERED: [ChartRange; 9] = [
        ChartRange::FiveDays,
        ChartRange::OneMonth,
        ChartRange::ThreeMonths,
        ChartRange::SixMonths,
        ChartRange::OneYear,
        ChartRange::TwoYears,
        ChartRange::FiveYears,
        ChartRange::TenYears,
        ChartRange::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::FiveDays => "5d",
            ChartRange::OneMonth => "1mo",
            ChartRange::ThreeMonths => "3mo",
            ChartRange::SixMonths => "6mo",
            ChartRange::OneYear => "1y",
            ChartRange::TwoYears => "2y",
            ChartRange::FiveYears => "5y",
            ChartRange::TenYears => "10y",
            ChartRange::Max => "max",
        }
    }

    /// Calendar days the range is guaranteed to reach back. `None` for `Max`.
    ///
    /// Month-based ranges use the shortest possible month so the guarantee holds
    /// whatever the current date is.
    pub fn lookback_days(&self) -> Option<i64> {
        match self {
            ChartRange::FiveDays => Some(5),
            ChartRange::OneMonth => Some(28),
            ChartRange::ThreeMonths => Some(89),
            ChartRange::SixMonths => Some(181),
            ChartRange::OneYear => Some(365),
            ChartRange::TwoYears => Some(730),
            ChartRange::FiveYears => Some(1826),
            ChartRange::TenYears => Some(3652),
            ChartRange::Max => None,
        }
    }

    /// Smallest range reaching back at least `days` calendar days.
    pub fn covering(days: i64) -> ChartRange {
        Self::ORDERED
            .into_iter()
            .find(|range| range.lookback_days().is_some_and(|d| d >= days))
            .unwrap_or(ChartRange::Max)
    }

    /// Smallest range that, fetched on `today`, includes `start` plus `buffer_days`
    /// extra days of history.
    pub fn covering_since(start: NaiveDate, today: NaiveDate, buffer_days: i64) -> ChartRange {
        let span = (today - start).num_days().max(0);
        Self::covering(span + buffer_days.max(0))
    }
}

impl std::fmt::Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
