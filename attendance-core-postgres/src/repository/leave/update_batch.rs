use async_trait::async_trait;
use attendance_core_api::ApiError;
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::repository::update_batch::UpdateBatch;
use crate::executor::ExecutorError;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::LeaveRepositoryImpl;

impl LeaveRepositoryImpl {
    pub(super) async fn update_batch_impl(
        repo: &LeaveRepositoryImpl,
        items: Vec<LeaveApplicationModel>,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;

        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE leave_application SET
                    leave_type = $2, from_date = $3, to_date = $4, reason = $5, status = $6,
                    is_paid = $7, total_days = $8, early_return = $9, actual_return_date = $10,
                    decided_by = $11, decided_at = $12, decision_notes = $13
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.leave_type)
            .bind(item.from_date)
            .bind(item.to_date)
            .bind(item.reason.as_str())
            .bind(item.status)
            .bind(item.is_paid)
            .bind(item.total_days)
            .bind(item.early_return)
            .bind(item.actual_return_date)
            .bind(item.decided_by)
            .bind(item.decided_at)
            .bind(item.decision_notes.as_deref())
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(Box::new(ApiError::NotFound(format!("leave {}", item.id))));
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, LeaveApplicationModel> for LeaveRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<LeaveApplicationModel>,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items).await
    }
}
