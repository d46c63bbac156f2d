//! Daily performance reconstruction.
//!
//! Every calendar day is valued from the ledger replayed up to that day and
//! the most recent cached close on or before it. Weekends and holidays carry
//! the last trading day forward; symbols with no cached price at all are
//! valued at their average cost.

mod performance_model;
mod performance_service;

pub use performance_model::{market_value, return_pct, DailyPerformancePoint, HoldingValuation};
pub use performance_service::{
    backfill_requests, symbols_held_in_window, PerformanceService, PerformanceServiceTrait,
};
