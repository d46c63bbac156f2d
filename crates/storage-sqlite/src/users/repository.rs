use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::UserDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::users;
use tradeboard_core::errors::{Error, Result};
use tradeboard_core::users::{NewUser, User, UserRepositoryTrait};

pub struct UserRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .map(User::from)
            .ok_or_else(|| Error::not_found(format!("user {}", user_id)))
    }

    fn list(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .select(UserDB::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    fn list_sharing(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .filter(
                users::share_daily_returns
                    .eq(true)
                    .or(users::share_full_portfolio.eq(true)),
            )
            .select(UserDB::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn upsert(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let now = Utc::now().naive_utc();
                let row = UserDB {
                    id: new_user.id,
                    display_name: new_user.display_name,
                    share_daily_returns: new_user.share_daily_returns,
                    share_full_portfolio: new_user.share_full_portfolio,
                    created_at: now,
                    updated_at: now,
                };

                diesel::insert_into(users::table)
                    .values(&row)
                    .on_conflict(users::id)
                    .do_update()
                    .set((
                        users::display_name.eq(&row.display_name),
                        users::share_daily_returns.eq(row.share_daily_returns),
                        users::share_full_portfolio.eq(row.share_full_portfolio),
                        users::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let stored = users::table
                    .find(&row.id)
                    .select(UserDB::as_select())
                    .first(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(stored))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup;

    fn new_user(id: &str, daily: bool, full: bool) -> NewUser {
        NewUser {
            id: id.to_string(),
            display_name: format!("User {}", id),
            share_daily_returns: daily,
            share_full_portfolio: full,
        }
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let (pool, writer, _temp_dir) = setup();
        let repo = UserRepository::new(pool, writer);

        let created = repo.upsert(new_user("alice", false, false)).await.unwrap();
        let mut changed = new_user("alice", true, false);
        changed.display_name = "Alice".to_string();
        let updated = repo.upsert(changed).await.unwrap();

        assert_eq!(updated.display_name, "Alice");
        assert!(updated.share_daily_returns);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_sharing_filters_and_orders_by_id() {
        let (pool, writer, _temp_dir) = setup();
        let repo = UserRepository::new(pool, writer);

        repo.upsert(new_user("carol", false, true)).await.unwrap();
        repo.upsert(new_user("bob", false, false)).await.unwrap();
        repo.upsert(new_user("alice", true, false)).await.unwrap();

        let ids: Vec<String> = repo
            .list_sharing()
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["alice".to_string(), "carol".to_string()]);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let (pool, writer, _temp_dir) = setup();
        let repo = UserRepository::new(pool, writer);
        assert!(repo.get_by_id("ghost").unwrap_err().is_not_found());
    }
}
