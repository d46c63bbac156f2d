//! Historical price cache - cached daily closes and the backfill policy that fills them.

mod model;
mod price_cache;
mod store;

pub use model::{
    BackfillOutcome, CoveragePolicy, HistoricalPrice, PriceSource, PriceTimeline, RangeRequest,
};
pub use price_cache::{PriceCacheConfig, PriceCacheService, PriceCacheServiceTrait};
pub use store::PriceStore;
