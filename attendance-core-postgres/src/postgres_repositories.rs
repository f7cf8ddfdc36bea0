use attendance_core_engine::Stores;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use tracing::debug;

use crate::executor::{Executor, ExecutorError};
use crate::repository::{
    AttendanceDayRepositoryImpl, LeaveRepositoryImpl, SalaryRecordRepositoryImpl,
    SitePolicyRepositoryImpl, WorkerRepositoryImpl,
};

pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Open a transaction and create every repository on top of it
    pub async fn create_session(&self) -> Result<PostgresSession, ExecutorError> {
        let tx = self.pool.begin().await?;
        let executor = Executor::new(tx);
        debug!("session transaction started");

        Ok(PostgresSession {
            workers: Arc::new(WorkerRepositoryImpl::new(executor.clone())),
            attendance: Arc::new(AttendanceDayRepositoryImpl::new(executor.clone())),
            leaves: Arc::new(LeaveRepositoryImpl::new(executor.clone())),
            salaries: Arc::new(SalaryRecordRepositoryImpl::new(executor.clone())),
            sites: Arc::new(SitePolicyRepositoryImpl::new(executor.clone())),
            executor,
        })
    }
}

/// Repositories sharing one transaction. Dropping the session without
/// committing rolls everything back.
pub struct PostgresSession {
    pub executor: Executor,
    pub workers: Arc<WorkerRepositoryImpl>,
    pub attendance: Arc<AttendanceDayRepositoryImpl>,
    pub leaves: Arc<LeaveRepositoryImpl>,
    pub salaries: Arc<SalaryRecordRepositoryImpl>,
    pub sites: Arc<SitePolicyRepositoryImpl>,
}

impl PostgresSession {
    /// The repositories as the engine consumes them
    pub fn stores(&self) -> Stores<Postgres> {
        Stores {
            workers: self.workers.clone(),
            attendance: self.attendance.clone(),
            leaves: self.leaves.clone(),
            salaries: self.salaries.clone(),
            sites: self.sites.clone(),
        }
    }

    pub async fn commit(&self) -> Result<(), ExecutorError> {
        self.executor.commit().await
    }

    pub async fn rollback(&self) -> Result<(), ExecutorError> {
        self.executor.rollback().await
    }
}
