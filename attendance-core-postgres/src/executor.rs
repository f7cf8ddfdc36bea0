use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Transaction has been consumed")]
    Consumed,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Shared handle on one open transaction.
///
/// Every repository of a session holds a clone, so all their statements run
/// in the same transaction. `commit` and `rollback` consume it; statements
/// issued afterwards fail with `ExecutorError::Consumed`.
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn commit(&self) -> Result<(), ExecutorError> {
        let tx = self.tx.lock().await.take().ok_or(ExecutorError::Consumed)?;
        tx.commit().await?;
        debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback(&self) -> Result<(), ExecutorError> {
        let tx = self.tx.lock().await.take().ok_or(ExecutorError::Consumed)?;
        tx.rollback().await?;
        debug!("transaction rolled back");
        Ok(())
    }

    pub async fn is_open(&self) -> bool {
        self.tx.lock().await.is_some()
    }
}
