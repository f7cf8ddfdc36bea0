use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::salary::SalaryRecordModel;

#[async_trait]
pub trait FindSalaryRecord<DB: Database>: Send + Sync {
    /// The record of one worker for one month, if calculated before
    async fn find_salary_record(
        &self,
        worker_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<Option<SalaryRecordModel>, Box<dyn std::error::Error + Send + Sync>>;
}
