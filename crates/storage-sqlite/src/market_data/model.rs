//! Database model for cached daily prices.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal, parse_optional_decimal};
use tradeboard_core::errors::{Error, Result};
use tradeboard_core::quotes::HistoricalPrice;

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::historical_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct HistoricalPriceDB {
    pub symbol: String,
    pub price_date: String,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub close: String,
    pub volume: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<HistoricalPriceDB> for HistoricalPrice {
    type Error = Error;

    fn try_from(db: HistoricalPriceDB) -> Result<Self> {
        Ok(Self {
            price_date: parse_date(&db.price_date)?,
            open: parse_optional_decimal(db.open.as_deref())?,
            high: parse_optional_decimal(db.high.as_deref())?,
            low: parse_optional_decimal(db.low.as_deref())?,
            close: parse_decimal(&db.close)?,
            volume: parse_optional_decimal(db.volume.as_deref())?,
            symbol: db.symbol,
        })
    }
}

impl HistoricalPriceDB {
    pub fn new(price: &HistoricalPrice, created_at: NaiveDateTime) -> Self {
        Self {
            symbol: price.symbol.clone(),
            price_date: format_date(price.price_date),
            open: price.open.map(|v| v.to_string()),
            high: price.high.map(|v| v.to_string()),
            low: price.low.map(|v| v.to_string()),
            close: price.close.to_string(),
            volume: price.volume.map(|v| v.to_string()),
            created_at,
        }
    }
}
