use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Database;
use uuid::Uuid;

use crate::models::leave::LeaveApplicationModel;

/// Lookup of approved leave overlapping a date range.
///
/// Implementations return every approved leave whose [from_date, to_date]
/// intersects [start, end]; callers apply early-return narrowing via
/// `LeaveApplicationModel::covers`.
#[async_trait]
pub trait FindApprovedLeaves<DB: Database>: Send + Sync {
    async fn find_approved_for_worker(
        &self,
        worker_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_approved_for_site(
        &self,
        site_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveApplicationModel>, Box<dyn std::error::Error + Send + Sync>>;
}
