use super::DbPool;
use crate::errors::StorageError;
use diesel::connection::Connection;
use diesel::SqliteConnection;
use log::{debug, error};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};
use tradeboard_core::errors::{DatabaseError, Error, Result};

// A write job runs against the actor's connection and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type AnyBox = Box<dyn Any + Send + 'static>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Return types are erased to `Box<dyn Any>` so one channel carries every job.
    tx: mpsc::Sender<(Job<AnyBox>, oneshot::Sender<Result<AnyBox>>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection,
    /// inside an immediate transaction. An `Err` from the job rolls it back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_stopped())?;

        let boxed = ret_rx.await.map_err(|_| writer_stopped())??;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::Unexpected("Writer actor returned an unexpected type".to_string()))
    }
}

fn writer_stopped() -> Error {
    Error::Database(DatabaseError::Internal(
        "Database writer is not running".to_string(),
    ))
}

/// Spawns a background Tokio task that acts as the single writer to the database.
/// The actor owns one pooled connection and processes jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(Job<AnyBox>, oneshot::Sender<Result<AnyBox>>)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping `rx` makes every later `exec` fail instead of hanging
                error!("Writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            // Keep the job's own error so callers still see NotFound, Validation etc.
            let mut job_error: Option<Error> = None;
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(|e| {
                        let message = e.to_string();
                        job_error = Some(e);
                        StorageError::CoreError(message)
                    })
                })
                .map_err(|e: StorageError| job_error.take().unwrap_or_else(|| e.into()));

            // The requester may have gone away (timeout, cancellation)
            let _ = reply_tx.send(result);
        }
        debug!("Writer actor stopped");
    });

    WriteHandle { tx }
}
