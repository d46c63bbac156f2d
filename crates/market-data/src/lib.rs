//! Tradeboard Market Data Crate
//!
//! Provider-agnostic access to daily price history.
//!
//! # Overview
//!
//! ```text
//! display label ("GOLD")
//!        |
//!        v
//! +------------------+
//! |    Resolver      |  resolve_market_symbol -> "GLD"
//! +------------------+
//!        |
//!        v
//! +------------------+
//! |    Provider      |  (Yahoo chart API, ...)
//! +------------------+
//!        |
//!        v
//! +------------------+
//! |   PriceSeries    |  daily OHLCV bars + live price metadata
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - Trait every daily chart source implements
//! - [`PriceSeries`] / [`DailyBar`] - Daily history returned by providers
//! - [`ChartRange`] - Lookback window requested from a provider
//! - [`Quote`] - Latest price for a symbol
//! - [`MarketDataError`] - Fetch failures, classified by [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

pub use errors::{MarketDataError, RetryClass};
pub use models::{ChartRange, DailyBar, PriceSeries, Quote};
pub use provider::yahoo::{YahooProvider, DEFAULT_BASE_URL as YAHOO_BASE_URL};
pub use provider::{MarketDataProvider, RateLimit};
pub use resolver::{normalize_symbol, resolve_market_symbol};
