use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::error;
use ratefeed_core::errors::{Error, Result};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job runs on the actor's connection inside an immediate transaction.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, Reply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// Jobs run one at a time, each in its own immediate transaction.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| Error::Unexpected("database writer has stopped".to_string()))?;

        let boxed = ret_rx
            .await
            .map_err(|_| Error::Unexpected("database writer dropped the reply".to_string()))??;

        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::Unexpected("database writer returned an unexpected type".to_string()))
    }
}

/// Spawns a background Tokio task that acts as the single writer to the database.
///
/// The actor checks out a pooled connection per job and processes jobs serially.
/// Must be called from within a Tokio runtime.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, Reply)>(64);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result = match pool.get() {
                Ok(mut conn) => conn
                    .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                    .map_err(Error::from),
                Err(e) => {
                    error!("Database writer could not get a connection: {}", e);
                    Err(StorageError::from(e).into())
                }
            };

            // The caller may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
