use async_trait::async_trait;
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::repository::create_batch::CreateBatch;
use crate::executor::ExecutorError;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::LeaveRepositoryImpl;

impl LeaveRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &LeaveRepositoryImpl,
        items: Vec<LeaveApplicationModel>,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO leave_application (
                    id, worker_id, site_id, leave_type, from_date, to_date, reason, status,
                    is_paid, total_days, early_return, actual_return_date, applied_at,
                    decided_by, decided_at, decision_notes
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
            )
            .bind(item.id)
            .bind(item.worker_id)
            .bind(item.site_id)
            .bind(item.leave_type)
            .bind(item.from_date)
            .bind(item.to_date)
            .bind(item.reason.as_str())
            .bind(item.status)
            .bind(item.is_paid)
            .bind(item.total_days)
            .bind(item.early_return)
            .bind(item.actual_return_date)
            .bind(item.applied_at)
            .bind(item.decided_by)
            .bind(item.decided_at)
            .bind(item.decision_notes.as_deref())
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, LeaveApplicationModel> for LeaveRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<LeaveApplicationModel>,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items).await
    }
}
