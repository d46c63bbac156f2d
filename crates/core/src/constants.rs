/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for return percentages
pub const RETURN_PCT_PRECISION: u32 = 4;

/// Extra calendar days requested beyond the backfill window, for holidays and thin trading
pub const PRICE_FETCH_BUFFER_DAYS: i64 = 7;

/// Default number of concurrent price backfills
pub const DEFAULT_BACKFILL_CONCURRENCY: usize = 4;

/// With the edge coverage policy, how far the first/last cached row may sit from the window ends
pub const DEFAULT_EDGE_TOLERANCE_DAYS: i64 = 5;

/// Trailing window used by the leaderboard when none is given
pub const DEFAULT_LEADERBOARD_WINDOW_DAYS: i64 = 30;

pub const MIN_LEADERBOARD_WINDOW_DAYS: i64 = 1;
pub const MAX_LEADERBOARD_WINDOW_DAYS: i64 = 3650;

/// Longest daily series a single reconstruction may produce (20 years)
pub const MAX_SERIES_DAYS: i64 = 7305;
