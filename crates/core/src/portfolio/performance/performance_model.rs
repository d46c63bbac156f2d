use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{DECIMAL_PRECISION, RETURN_PCT_PRECISION};
use crate::quotes::PriceSource;

/// Valuation of one open position on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub symbol: String,
    pub shares: Decimal,
    pub price: Decimal,
    pub market_value: Decimal,
    pub total_cost: Decimal,
    pub price_source: PriceSource,
}

/// Portfolio value and return for one user on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPerformancePoint {
    pub date: NaiveDate,
    pub portfolio_value: Decimal,
    pub portfolio_cost: Decimal,
    pub return_pct: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holdings: Vec<HoldingValuation>,
}

impl DailyPerformancePoint {
    pub fn from_valuations(date: NaiveDate, holdings: Vec<HoldingValuation>) -> Self {
        let portfolio_value = holdings
            .iter()
            .fold(Decimal::ZERO, |acc, h| acc.saturating_add(h.market_value));
        let portfolio_cost = holdings
            .iter()
            .fold(Decimal::ZERO, |acc, h| acc.saturating_add(h.total_cost));
        Self {
            date,
            portfolio_value: portfolio_value.round_dp(DECIMAL_PRECISION),
            portfolio_cost: portfolio_cost.round_dp(DECIMAL_PRECISION),
            return_pct: return_pct(portfolio_value, portfolio_cost),
            holdings,
        }
    }

    pub fn without_holdings(mut self) -> Self {
        self.holdings = Vec::new();
        self
    }
}

/// `shares * price`, saturated at `Decimal::MAX` when the product overflows.
pub fn market_value(symbol: &str, shares: Decimal, price: Decimal) -> Decimal {
    match shares.checked_mul(price) {
        Some(value) => value.round_dp(DECIMAL_PRECISION),
        None => {
            warn!(
                "Market value of {} {} at {} overflows, saturating",
                shares, symbol, price
            );
            Decimal::MAX
        }
    }
}

/// Simple return on cost in percent. Zero when there is no cost basis.
pub fn return_pct(value: Decimal, cost: Decimal) -> Decimal {
    if cost <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let gain = value.saturating_sub(cost);
    match gain
        .checked_div(cost)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
    {
        Some(pct) => pct.round_dp(RETURN_PCT_PRECISION),
        None if gain.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}
