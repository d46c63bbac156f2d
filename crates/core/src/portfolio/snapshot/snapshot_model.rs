//! Portfolio snapshot domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DECIMAL_PRECISION, RETURN_PCT_PRECISION};
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::performance::HoldingValuation;

/// Point-in-time record of a user's portfolio, at most one per user per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    /// `{user_id}_{YYYY-MM-DD}`
    pub id: String,
    pub user_id: String,
    pub snapshot_date: NaiveDate,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub daily_return: Decimal,
    /// Holdings breakdown as stored, a JSON array of holding valuations
    pub portfolio_data_json: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PortfolioSnapshot {
    pub fn snapshot_id(user_id: &str, snapshot_date: NaiveDate) -> String {
        format!("{}_{}", user_id, snapshot_date.format("%Y-%m-%d"))
    }

    /// Parses the stored breakdown back into valuations.
    pub fn holdings(&self) -> Result<Vec<HoldingValuation>> {
        Ok(serde_json::from_str(&self.portfolio_data_json)?)
    }
}

fn empty_portfolio() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

/// Input model for saving a snapshot with explicit values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnapshot {
    #[serde(default)]
    pub user_id: String,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub daily_return: Decimal,
    #[serde(default = "empty_portfolio")]
    pub portfolio_data: serde_json::Value,
}

impl NewSnapshot {
    pub fn validate(mut self) -> Result<Self> {
        self.user_id = self.user_id.trim().to_string();
        if self.user_id.is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.total_value < Decimal::ZERO || self.total_cost < Decimal::ZERO {
            return Err(Error::invalid_input(
                "totalValue and totalCost must not be negative",
            ));
        }
        if !(self.portfolio_data.is_array() || self.portfolio_data.is_object()) {
            return Err(Error::invalid_input(
                "portfolioData must be a JSON array or object",
            ));
        }
        self.total_value = self.total_value.round_dp(DECIMAL_PRECISION);
        self.total_cost = self.total_cost.round_dp(DECIMAL_PRECISION);
        self.daily_return = self.daily_return.round_dp(RETURN_PCT_PRECISION);
        Ok(self)
    }

    pub fn into_snapshot(self, snapshot_date: NaiveDate, now: NaiveDateTime) -> PortfolioSnapshot {
        PortfolioSnapshot {
            id: PortfolioSnapshot::snapshot_id(&self.user_id, snapshot_date),
            user_id: self.user_id,
            snapshot_date,
            total_value: self.total_value,
            total_cost: self.total_cost,
            daily_return: self.daily_return,
            portfolio_data_json: self.portfolio_data.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of a capture pass over every registered user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSummary {
    pub captured: usize,
    /// Users with no transactions
    pub skipped: usize,
    pub failed: usize,
}
