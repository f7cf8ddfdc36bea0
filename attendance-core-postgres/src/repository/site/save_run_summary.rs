use async_trait::async_trait;
use attendance_core_api::AutoCloseSummary;
use attendance_core_db::repository::save_run_summary::SaveRunSummary;
use crate::executor::ExecutorError;
use sqlx::types::Json;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SitePolicyRepositoryImpl;

#[async_trait]
impl SaveRunSummary<Postgres> for SitePolicyRepositoryImpl {
    async fn save_run_summary(
        &self,
        site_id: Uuid,
        summary: &AutoCloseSummary,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
        let result = sqlx::query(r#"UPDATE site_policy SET last_auto_close = $2 WHERE site_id = $1"#)
            .bind(site_id)
            .bind(Json(summary))
            .execute(&mut **transaction)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
