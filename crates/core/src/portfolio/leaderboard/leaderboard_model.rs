use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::performance::DailyPerformancePoint;

/// One opted-in user's position on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    /// 1-based rank, ordered by `current_return_pct` descending
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub current_return_pct: Decimal,
    pub current_value: Decimal,
    pub current_cost: Decimal,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Whether `performance_series` carries per-day holdings
    pub shares_full_portfolio: bool,
    pub performance_series: Vec<DailyPerformancePoint>,
}
