//! Database model for portfolio snapshots.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal};
use tradeboard_core::errors::{Error, Result};
use tradeboard_core::portfolio::snapshot::PortfolioSnapshot;

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::portfolio_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioSnapshotDB {
    pub id: String,
    pub user_id: String,
    pub snapshot_date: String,
    pub total_value: String,
    pub total_cost: String,
    pub daily_return: String,
    pub portfolio_data_json: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<PortfolioSnapshotDB> for PortfolioSnapshot {
    type Error = Error;

    fn try_from(db: PortfolioSnapshotDB) -> Result<Self> {
        Ok(Self {
            snapshot_date: parse_date(&db.snapshot_date)?,
            total_value: parse_decimal(&db.total_value)?,
            total_cost: parse_decimal(&db.total_cost)?,
            daily_return: parse_decimal(&db.daily_return)?,
            id: db.id,
            user_id: db.user_id,
            portfolio_data_json: db.portfolio_data_json,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<PortfolioSnapshot> for PortfolioSnapshotDB {
    fn from(domain: PortfolioSnapshot) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            snapshot_date: format_date(domain.snapshot_date),
            total_value: domain.total_value.to_string(),
            total_cost: domain.total_cost.to_string(),
            daily_return: domain.daily_return.to_string(),
            portfolio_data_json: domain.portfolio_data_json,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
