use async_trait::async_trait;
use attendance_core_db::models::salary::SalaryRecordModel;
use attendance_core_db::repository::load::Load;
use crate::executor::ExecutorError;
use crate::utils::TryFromRow;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SalaryRecordRepositoryImpl;

#[async_trait]
impl Load<Postgres, SalaryRecordModel> for SalaryRecordRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<SalaryRecordModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(r#"SELECT * FROM salary_record WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.map(|row| SalaryRecordModel::try_from_row(&row)).transpose()
    }
}
