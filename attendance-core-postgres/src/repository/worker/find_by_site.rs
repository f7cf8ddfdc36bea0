use async_trait::async_trait;
use attendance_core_api::EmploymentStatus;
use attendance_core_db::models::worker::WorkerModel;
use attendance_core_db::repository::find_by_site::FindBySite;
use crate::executor::ExecutorError;
use crate::utils::TryFromRow;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::WorkerRepositoryImpl;

impl WorkerRepositoryImpl {
    pub(super) async fn find_by_site_impl(
        repo: &WorkerRepositoryImpl,
        site_id: Uuid,
        status: Option<EmploymentStatus>,
    ) -> Result<Vec<WorkerModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"
            SELECT * FROM worker
            WHERE site_id = $1
              AND ($2::employment_status IS NULL OR employment_status = $2)
            ORDER BY display_name, id
        "#;
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(query)
                .bind(site_id)
                .bind(status)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut workers = Vec::with_capacity(rows.len());
        for row in rows {
            workers.push(WorkerModel::try_from_row(&row)?);
        }
        Ok(workers)
    }
}

#[async_trait]
impl FindBySite<Postgres> for WorkerRepositoryImpl {
    async fn find_by_site(
        &self,
        site_id: Uuid,
        status: Option<EmploymentStatus>,
    ) -> Result<Vec<WorkerModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_site_impl(self, site_id, status).await
    }
}
