use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::dsl::{max, min};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::HistoricalPriceDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::historical_prices::dsl as prices_dsl;
use crate::utils::{chunk_for_sqlite, format_date, parse_date};
use tradeboard_core::quotes::{HistoricalPrice, PriceStore};
use tradeboard_core::Result;

pub struct PriceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PriceStore for PriceRepository {
    fn get_price_on_or_before(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<HistoricalPrice>> {
        let mut conn = get_connection(&self.pool)?;
        prices_dsl::historical_prices
            .filter(prices_dsl::symbol.eq(symbol))
            .filter(prices_dsl::price_date.le(format_date(date)))
            .order(prices_dsl::price_date.desc())
            .select(HistoricalPriceDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .map(HistoricalPrice::try_from)
            .transpose()
    }

    fn get_prices_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoricalPrice>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = prices_dsl::historical_prices
            .filter(prices_dsl::symbol.eq(symbol))
            .filter(prices_dsl::price_date.between(format_date(start), format_date(end)))
            .order(prices_dsl::price_date.asc())
            .select(HistoricalPriceDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter().map(HistoricalPrice::try_from).collect()
    }

    fn get_date_bounds_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let mut conn = get_connection(&self.pool)?;
        let (first, last) = prices_dsl::historical_prices
            .filter(prices_dsl::symbol.eq(symbol))
            .filter(prices_dsl::price_date.between(format_date(start), format_date(end)))
            .select((min(prices_dsl::price_date), max(prices_dsl::price_date)))
            .first::<(Option<String>, Option<String>)>(&mut conn)
            .into_core()?;

        match (first, last) {
            (Some(first), Some(last)) => Ok(Some((parse_date(&first)?, parse_date(&last)?))),
            _ => Ok(None),
        }
    }

    async fn insert_prices_ignore_existing(&self, prices: Vec<HistoricalPrice>) -> Result<usize> {
        if prices.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().naive_utc();
        let rows: Vec<HistoricalPriceDB> = prices
            .iter()
            .map(|p| HistoricalPriceDB::new(p, now))
            .collect();
        let offered = rows.len();

        let inserted = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut inserted = 0;
                for chunk in chunk_for_sqlite(&rows) {
                    inserted += diesel::insert_or_ignore_into(prices_dsl::historical_prices)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await?;

        debug!("Inserted {} of {} price rows", inserted, offered);
        Ok(inserted)
    }
}
