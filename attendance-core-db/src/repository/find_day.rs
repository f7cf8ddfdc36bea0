use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Database;
use uuid::Uuid;

use crate::models::attendance::AttendanceDayModel;

/// Reads of attendance days keyed by (worker, date)
#[async_trait]
pub trait FindDay<DB: Database>: Send + Sync {
    async fn find_day(
        &self,
        worker_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceDayModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// Days of one worker within [start, end], ordered by date
    async fn find_days_in_range(
        &self,
        worker_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceDayModel>, Box<dyn std::error::Error + Send + Sync>>;
}
