use attendance_core_api::{ApiError, ApiResult, IssueKind};
use attendance_core_db::models::attendance::{AttendanceDayModel, ValidationIssue};
use attendance_core_db::repository::{FindDay, SaveDay};
use chrono::NaiveDate;
use sqlx::Database;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::stores::Stores;

/// Reviewer sign-off on a closed day
pub struct ReconciliationService<DB: Database> {
    stores: Stores<DB>,
    clock: Arc<dyn Clock>,
}

impl<DB: Database> ReconciliationService<DB> {
    pub fn new(stores: Stores<DB>, clock: Arc<dyn Clock>) -> Self {
        Self { stores, clock }
    }

    pub async fn reconcile_day(
        &self,
        worker_id: Uuid,
        date: NaiveDate,
        reviewer_id: Uuid,
        notes: Option<String>,
    ) -> ApiResult<AttendanceDayModel> {
        let mut day = self
            .stores
            .attendance
            .find_day(worker_id, date)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("attendance of worker {worker_id} on {date}")))?;

        let now = self.clock.now();
        let expected_version = day.version;
        day.reconciled = true;
        day.reconciled_by = Some(reviewer_id);
        day.reconciled_at = Some(now);
        day.reconciliation_notes = notes;
        day.validation_issues.push(ValidationIssue::info(
            IssueKind::Reconciliation,
            format!("Reconciled by {reviewer_id}"),
            now,
        ));

        let day = self.stores.attendance.update_day(&day, expected_version).await?;
        info!(%worker_id, %date, %reviewer_id, "day reconciled");
        Ok(day)
    }
}
