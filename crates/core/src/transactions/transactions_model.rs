//! Transaction ledger domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSide {
    Buy,
    Sell,
}

impl TransactionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSide::Buy => "buy",
            TransactionSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TransactionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TransactionSide::Buy),
            "sell" => Ok(TransactionSide::Sell),
            other => Err(Error::invalid_input(format!(
                "Unknown transaction side '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing a recorded buy or sell.
///
/// Rows are immutable once written. `id` is assigned by the store in insertion
/// order and breaks ties between transactions on the same date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub symbol: String,
    pub side: TransactionSide,
    pub shares: Decimal,
    pub price_per_share: Decimal,
    pub transaction_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn amount(&self) -> Decimal {
        self.shares.saturating_mul(self.price_per_share)
    }
}

/// Input model for recording a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub user_id: String,
    pub symbol: String,
    pub side: TransactionSide,
    pub shares: Decimal,
    pub price_per_share: Decimal,
    pub transaction_date: NaiveDate,
}

impl NewTransaction {
    /// Checks the ledger boundary rules and upper-cases the symbol.
    pub fn validate(mut self) -> Result<Self> {
        self.user_id = self.user_id.trim().to_string();
        self.symbol = self.symbol.trim().to_ascii_uppercase();

        if self.user_id.is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.symbol.is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }
        if !self.symbol.is_ascii() {
            return Err(Error::invalid_input(format!(
                "Symbol '{}' must be ASCII",
                self.symbol
            )));
        }
        if self.shares <= Decimal::ZERO {
            return Err(Error::invalid_input("shares must be greater than zero"));
        }
        if self.price_per_share <= Decimal::ZERO {
            return Err(Error::invalid_input(
                "pricePerShare must be greater than zero",
            ));
        }
        if self.shares.checked_mul(self.price_per_share).is_none() {
            return Err(Error::invalid_input(
                "shares * pricePerShare is out of range",
            ));
        }
        Ok(self)
    }
}

/// Sorts transactions into replay order: date ascending, then id.
pub fn sort_for_replay(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        a.transaction_date
            .cmp(&b.transaction_date)
            .then(a.id.cmp(&b.id))
    });
}
