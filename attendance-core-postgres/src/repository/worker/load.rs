use async_trait::async_trait;
use attendance_core_db::models::worker::WorkerModel;
use attendance_core_db::repository::load::Load;
use crate::executor::ExecutorError;
use crate::utils::TryFromRow;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::WorkerRepositoryImpl;

impl WorkerRepositoryImpl {
    pub(super) async fn load_impl(
        repo: &WorkerRepositoryImpl,
        id: Uuid,
    ) -> Result<Option<WorkerModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM worker WHERE id = $1"#;
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(query).bind(id).fetch_optional(&mut **transaction).await?
        };
        row.map(|row| WorkerModel::try_from_row(&row)).transpose()
    }
}

#[async_trait]
impl Load<Postgres, WorkerModel> for WorkerRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<WorkerModel>, Box<dyn Error + Send + Sync>> {
        Self::load_impl(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_test_worker, setup_test_context};
    use attendance_core_db::repository::create_batch::CreateBatch;
    use attendance_core_db::repository::load::Load;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_load() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let worker_repo = &ctx.session().workers;

        let worker = create_test_worker(Uuid::new_v4(), "Loaded Worker");
        worker_repo.create_batch(vec![worker.clone()]).await?;

        let loaded = worker_repo.load(worker.id).await?;
        assert_eq!(loaded, Some(worker));

        assert_eq!(worker_repo.load(Uuid::new_v4()).await?, None);

        Ok(())
    }
}
