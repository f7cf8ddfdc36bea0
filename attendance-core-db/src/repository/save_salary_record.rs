use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::salary::SalaryRecordModel;

/// Writes of salary records, guarded by the record hash
#[async_trait]
pub trait SaveSalaryRecord<DB: Database>: Send + Sync {
    /// Insert a new record. A second record for the same (worker, year, month)
    /// fails with a boxed `ApiError::Conflict`.
    async fn insert_salary_record(
        &self,
        record: &SalaryRecordModel,
    ) -> Result<SalaryRecordModel, Box<dyn std::error::Error + Send + Sync>>;

    /// Replace a record whose stored hash still equals `expected_hash`.
    ///
    /// A hash mismatch fails with a boxed `ApiError::Conflict`.
    async fn update_salary_record(
        &self,
        record: &SalaryRecordModel,
        expected_hash: i64,
    ) -> Result<SalaryRecordModel, Box<dyn std::error::Error + Send + Sync>>;

    /// Serialize calculations of one (worker, year, month) across processes.
    /// Stores without cross-process locking keep the default no-op.
    async fn lock_salary_period(
        &self,
        _worker_id: Uuid,
        _year: i32,
        _month: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}
