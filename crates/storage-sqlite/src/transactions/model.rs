//! Database models for ledger transactions.
//!
//! Quantities and prices are stored as decimal TEXT, dates as `YYYY-MM-DD`.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal};
use tradeboard_core::errors::{Error, Result};
use tradeboard_core::transactions::{NewTransaction, Transaction};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: i64,
    pub user_id: String,
    pub symbol: String,
    pub side: String,
    pub shares: String,
    pub price_per_share: String,
    pub transaction_date: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub user_id: String,
    pub symbol: String,
    pub side: String,
    pub shares: String,
    pub price_per_share: String,
    pub transaction_date: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            side: db.side.parse()?,
            shares: parse_decimal(&db.shares)?,
            price_per_share: parse_decimal(&db.price_per_share)?,
            transaction_date: parse_date(&db.transaction_date)?,
            user_id: db.user_id,
            symbol: db.symbol,
            created_at: db.created_at,
        })
    }
}

impl NewTransactionDB {
    pub fn new(domain: NewTransaction, created_at: NaiveDateTime) -> Self {
        Self {
            user_id: domain.user_id,
            symbol: domain.symbol,
            side: domain.side.as_str().to_string(),
            shares: domain.shares.to_string(),
            price_per_share: domain.price_per_share.to_string(),
            transaction_date: format_date(domain.transaction_date),
            created_at,
        }
    }
}
