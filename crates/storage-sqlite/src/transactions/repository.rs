use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::{NewTransactionDB, TransactionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::transactions;
use tradeboard_core::errors::Result;
use tradeboard_core::transactions::{NewTransaction, Transaction, TransactionRepositoryTrait};

pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order((transactions::transaction_date.asc(), transactions::id.asc()))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let row = NewTransactionDB::new(new_transaction, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let inserted = diesel::insert_into(transactions::table)
                    .values(&row)
                    .returning(TransactionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Transaction::try_from(inserted)
            })
            .await
    }

    async fn delete_for_user(&self, user_id: &str, transaction_id: i64) -> Result<usize> {
        let owner = user_id.to_string();
        let deleted = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    transactions::table
                        .filter(transactions::id.eq(transaction_id))
                        .filter(transactions::user_id.eq(owner)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await?;
        debug!(
            "Deleted {} row(s) for transaction {} of {}",
            deleted, transaction_id, user_id
        );
        Ok(deleted)
    }
}
