use async_trait::async_trait;
use attendance_core_db::models::worker::WorkerModel;
use attendance_core_db::repository::create_batch::CreateBatch;
use crate::executor::ExecutorError;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::WorkerRepositoryImpl;

impl WorkerRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &WorkerRepositoryImpl,
        items: Vec<WorkerModel>,
    ) -> Result<Vec<WorkerModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO worker (
                    id, site_id, display_name, employment_status, current_direction,
                    last_check_in, last_check_out, base_salary, joining_date, exit_date
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(item.id)
            .bind(item.site_id)
            .bind(item.display_name.as_str())
            .bind(item.employment_status)
            .bind(item.current_direction)
            .bind(item.last_check_in)
            .bind(item.last_check_out)
            .bind(item.base_salary)
            .bind(item.joining_date)
            .bind(item.exit_date)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, WorkerModel> for WorkerRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<WorkerModel>,
    ) -> Result<Vec<WorkerModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items).await
    }
}
