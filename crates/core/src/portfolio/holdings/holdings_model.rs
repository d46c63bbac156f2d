use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::TransactionSide;

/// Running per-symbol state of the weighted-average-cost fold.
///
/// Over-sells are applied as given, so both fields may go negative. Arithmetic
/// saturates at the `Decimal` bounds instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionState {
    pub total_shares: Decimal,
    pub total_cost: Decimal,
}

impl PositionState {
    /// Buys add at their price. Sells remove shares at the current average
    /// cost, leaving the average of the remaining shares unchanged.
    pub fn apply(&mut self, side: TransactionSide, shares: Decimal, price_per_share: Decimal) {
        match side {
            TransactionSide::Buy => {
                self.total_shares = self.total_shares.saturating_add(shares);
                self.total_cost = self
                    .total_cost
                    .saturating_add(shares.saturating_mul(price_per_share));
            }
            TransactionSide::Sell => {
                let average_cost = self.average_cost();
                self.total_shares = self.total_shares.saturating_sub(shares);
                self.total_cost = self
                    .total_cost
                    .saturating_sub(shares.saturating_mul(average_cost));
            }
        }
    }

    /// Zero when no shares are held.
    pub fn average_cost(&self) -> Decimal {
        if self.total_shares > Decimal::ZERO {
            match self.total_cost.checked_div(self.total_shares) {
                Some(average) => average,
                None if self.total_cost.is_sign_negative() => Decimal::MIN,
                None => Decimal::MAX,
            }
        } else {
            Decimal::ZERO
        }
    }

    /// Closed and over-sold positions are not valued.
    pub fn is_open(&self) -> bool {
        self.total_shares > Decimal::ZERO
    }
}

/// An open position as of a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub total_shares: Decimal,
    pub average_cost: Decimal,
    pub total_cost: Decimal,
}

impl Holding {
    pub fn from_position(symbol: &str, position: &PositionState) -> Self {
        Self {
            symbol: symbol.to_string(),
            total_shares: position.total_shares,
            average_cost: position.average_cost(),
            total_cost: position.total_cost,
        }
    }
}
