//! Symbol resolution for market data providers.
//!
//! Users enter assets by familiar labels ("GOLD", "BTC"). Providers only know
//! tradable tickers ("GLD", "BTC-USD"). The resolver maps one to the other
//! before any cache lookup or fetch, so the price cache is keyed by market
//! symbol only.

mod symbol_resolver;

pub use symbol_resolver::{normalize_symbol, resolve_market_symbol};
