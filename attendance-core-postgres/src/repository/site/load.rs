use async_trait::async_trait;
use attendance_core_db::models::site::SitePolicyModel;
use attendance_core_db::repository::load::Load;
use crate::executor::ExecutorError;
use crate::utils::TryFromRow;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SitePolicyRepositoryImpl;

#[async_trait]
impl Load<Postgres, SitePolicyModel> for SitePolicyRepositoryImpl {
    async fn load(&self, site_id: Uuid) -> Result<Option<SitePolicyModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(r#"SELECT * FROM site_policy WHERE site_id = $1"#)
                .bind(site_id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.map(|row| SitePolicyModel::try_from_row(&row)).transpose()
    }
}
