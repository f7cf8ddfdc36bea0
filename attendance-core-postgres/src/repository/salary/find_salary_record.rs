use async_trait::async_trait;
use attendance_core_db::models::salary::SalaryRecordModel;
use attendance_core_db::repository::find_salary_record::FindSalaryRecord;
use crate::executor::ExecutorError;
use crate::utils::TryFromRow;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SalaryRecordRepositoryImpl;

#[async_trait]
impl FindSalaryRecord<Postgres> for SalaryRecordRepositoryImpl {
    async fn find_salary_record(
        &self,
        worker_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<Option<SalaryRecordModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM salary_record WHERE worker_id = $1 AND year = $2 AND month = $3"#;
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(query)
                .bind(worker_id)
                .bind(year)
                .bind(month)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.map(|row| SalaryRecordModel::try_from_row(&row)).transpose()
    }
}
