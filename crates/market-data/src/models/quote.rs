use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market quote for a symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Market symbol the quote belongs to
    pub symbol: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Current price, or the previous close when the market has not traded yet
    pub price: Decimal,

    /// Previous session close, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,

    /// Quote currency
    pub currency: String,

    /// Source of the quote (YAHOO, ...)
    pub source: String,
}

impl Quote {
    pub fn new(symbol: &str, timestamp: DateTime<Utc>, price: Decimal, source: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            timestamp,
            price,
            previous_close: None,
            currency: "USD".to_string(),
            source: source.to_string(),
        }
    }
}
