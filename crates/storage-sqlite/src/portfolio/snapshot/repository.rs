use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::PortfolioSnapshotDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::portfolio_snapshots::dsl::*;
use crate::utils::format_date;
use tradeboard_core::errors::Result;
use tradeboard_core::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};

pub struct SnapshotRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn upsert_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        let row = PortfolioSnapshotDB::from(snapshot);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PortfolioSnapshot> {
                // One statement; a concurrent save for the same day cannot create a second row
                diesel::insert_into(portfolio_snapshots)
                    .values(&row)
                    .on_conflict((user_id, snapshot_date))
                    .do_update()
                    .set((
                        total_value.eq(&row.total_value),
                        total_cost.eq(&row.total_cost),
                        daily_return.eq(&row.daily_return),
                        portfolio_data_json.eq(&row.portfolio_data_json),
                        updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let stored = portfolio_snapshots
                    .filter(user_id.eq(&row.user_id))
                    .filter(snapshot_date.eq(&row.snapshot_date))
                    .select(PortfolioSnapshotDB::as_select())
                    .first(conn)
                    .map_err(StorageError::from)?;
                PortfolioSnapshot::try_from(stored)
            })
            .await
    }

    fn list_snapshots_since(
        &self,
        input_user_id: &str,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = portfolio_snapshots
            .into_boxed()
            .filter(user_id.eq(input_user_id));
        if let Some(start) = since {
            query = query.filter(snapshot_date.ge(format_date(start)));
        }
        let rows = query
            .order(snapshot_date.asc())
            .select(PortfolioSnapshotDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter().map(PortfolioSnapshot::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_user, setup};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn snapshot(owner: &str, date: NaiveDate, value: Decimal) -> PortfolioSnapshot {
        let now = Utc::now().naive_utc();
        PortfolioSnapshot {
            id: PortfolioSnapshot::snapshot_id(owner, date),
            user_id: owner.to_string(),
            snapshot_date: date,
            total_value: value,
            total_cost: dec!(1000),
            daily_return: dec!(2.5),
            portfolio_data_json: "[]".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_same_day_keeps_one_row() {
        let (pool, writer, _temp_dir) = setup();
        insert_user(&pool, "alice");
        let repo = SnapshotRepository::new(pool, writer);

        let first = repo
            .upsert_snapshot(snapshot("alice", day(15), dec!(1100)))
            .await
            .unwrap();

        let mut later = snapshot("alice", day(15), dec!(1250.5));
        later.created_at = first.created_at + Duration::hours(3);
        later.updated_at = later.created_at;
        later.portfolio_data_json = r#"[{"symbol":"AAPL"}]"#.to_string();
        let second = repo.upsert_snapshot(later).await.unwrap();

        assert_eq!(second.id, "alice_2024-03-15");
        assert_eq!(second.total_value, dec!(1250.5));
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);

        let all = repo.list_snapshots_since("alice", None).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].portfolio_data_json.contains("AAPL"));
    }

    #[tokio::test]
    async fn test_concurrent_upserts_leave_one_row() {
        let (pool, writer, _temp_dir) = setup();
        insert_user(&pool, "alice");
        let repo = Arc::new(SnapshotRepository::new(pool, writer));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.upsert_snapshot(snapshot("alice", day(15), Decimal::from(i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.list_snapshots_since("alice", None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_since_filters_and_orders() {
        let (pool, writer, _temp_dir) = setup();
        insert_user(&pool, "alice");
        insert_user(&pool, "bob");
        let repo = SnapshotRepository::new(pool, writer);

        for d in [12, 10, 11] {
            repo.upsert_snapshot(snapshot("alice", day(d), dec!(1)))
                .await
                .unwrap();
        }
        repo.upsert_snapshot(snapshot("bob", day(11), dec!(1)))
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = repo
            .list_snapshots_since("alice", Some(day(11)))
            .unwrap()
            .into_iter()
            .map(|s| s.snapshot_date)
            .collect();
        assert_eq!(dates, vec![day(11), day(12)]);
        assert_eq!(repo.list_snapshots_since("alice", None).unwrap().len(), 3);
    }
}
