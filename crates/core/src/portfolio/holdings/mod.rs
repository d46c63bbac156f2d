//! Holdings - weighted-average-cost positions derived from the ledger.

mod holdings_calculator;
mod holdings_model;
mod holdings_service;

pub use holdings_calculator::{calculate_holdings, calculate_positions, HoldingsCalculator};
pub use holdings_model::{Holding, PositionState};
pub use holdings_service::{HoldingsService, HoldingsServiceTrait};
