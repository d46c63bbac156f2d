//! SQLite storage implementation for the historical price cache.

mod model;
mod repository;

pub use model::HistoricalPriceDB;
pub use repository::PriceRepository;

// Re-export trait from core for convenience
pub use tradeboard_core::quotes::PriceStore;
