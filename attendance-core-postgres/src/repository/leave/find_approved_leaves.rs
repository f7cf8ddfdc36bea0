use async_trait::async_trait;
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::repository::find_approved_leaves::FindApprovedLeaves;
use chrono::NaiveDate;
use crate::executor::ExecutorError;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::LeaveRepositoryImpl;

impl LeaveRepositoryImpl {
    /// `owner_column` is either `worker_id` or `site_id`
    async fn find_approved_impl(
        repo: &LeaveRepositoryImpl,
        owner_column: &'static str,
        owner_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        let query = format!(
            r#"
            SELECT * FROM leave_application
            WHERE {owner_column} = $1
              AND status = 'approved'
              AND from_date <= $3
              AND to_date >= $2
            ORDER BY from_date, id
            "#
        );
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(&query)
                .bind(owner_id)
                .bind(start)
                .bind(end)
                .fetch_all(&mut **transaction)
                .await?
        };
        Self::rows_to_models(rows)
    }
}

#[async_trait]
impl FindApprovedLeaves<Postgres> for LeaveRepositoryImpl {
    async fn find_approved_for_worker(
        &self,
        worker_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        Self::find_approved_impl(self, "worker_id", worker_id, start, end).await
    }

    async fn find_approved_for_site(
        &self,
        site_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        Self::find_approved_impl(self, "site_id", site_id, start, end).await
    }
}
