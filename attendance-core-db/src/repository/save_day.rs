use async_trait::async_trait;
use sqlx::Database;

use crate::models::attendance::AttendanceDayModel;

/// Writes of attendance days with upsert semantics keyed on (worker, date)
#[async_trait]
pub trait SaveDay<DB: Database>: Send + Sync {
    /// Insert the day unless one already exists for the same (worker, date).
    ///
    /// # Returns
    /// * `Ok(true)` - The day was inserted
    /// * `Ok(false)` - A day already existed and was left untouched
    async fn create_day_if_absent(
        &self,
        day: &AttendanceDayModel,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Replace a persisted day if its stored version still equals
    /// `expected_version`. The stored version becomes `expected_version + 1`.
    ///
    /// A version mismatch fails with a boxed `ApiError::Conflict`.
    async fn update_day(
        &self,
        day: &AttendanceDayModel,
        expected_version: i64,
    ) -> Result<AttendanceDayModel, Box<dyn std::error::Error + Send + Sync>>;
}
