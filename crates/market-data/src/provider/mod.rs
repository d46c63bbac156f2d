//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Rate limiting configuration
//! - The Yahoo chart provider

mod capabilities;
mod traits;

pub mod yahoo;

// Re-exports
pub use capabilities::RateLimit;
pub use traits::MarketDataProvider;
