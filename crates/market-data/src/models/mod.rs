//! Market data models.

mod chart;
mod quote;

pub use chart::{ChartRange, DailyBar, PriceSeries};
pub use quote::Quote;
