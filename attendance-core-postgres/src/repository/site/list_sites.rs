use async_trait::async_trait;
use attendance_core_db::repository::list_sites::ListSites;
use crate::executor::ExecutorError;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SitePolicyRepositoryImpl;

#[async_trait]
impl ListSites<Postgres> for SitePolicyRepositoryImpl {
    async fn list_sites(&self) -> Result<Vec<Uuid>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
        let ids: Vec<Uuid> = sqlx::query_scalar(r#"SELECT site_id FROM site_policy ORDER BY site_id"#)
            .fetch_all(&mut **transaction)
            .await?;
        Ok(ids)
    }
}
