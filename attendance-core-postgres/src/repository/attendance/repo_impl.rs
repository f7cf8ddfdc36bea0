use attendance_core_db::models::attendance::AttendanceDayModel;
use crate::executor::Executor;
use crate::utils::{get_json, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct AttendanceDayRepositoryImpl {
    pub executor: Executor,
}

impl AttendanceDayRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for AttendanceDayModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(AttendanceDayModel {
            id: row.try_get("id")?,
            worker_id: row.try_get("worker_id")?,
            site_id: row.try_get("site_id")?,
            date: row.try_get("date")?,
            entries: get_json(row, "entries")?,
            check_in_time: row.try_get("check_in_time")?,
            check_out_time: row.try_get("check_out_time")?,
            total_hours: row.try_get("total_hours")?,
            status: row.try_get("status")?,
            is_late: row.try_get("is_late")?,
            is_early_leave: row.try_get("is_early_leave")?,
            leave_id: row.try_get("leave_id")?,
            validation_issues: get_json(row, "validation_issues")?,
            reconciled: row.try_get("reconciled")?,
            reconciled_by: row.try_get("reconciled_by")?,
            reconciled_at: row.try_get("reconciled_at")?,
            reconciliation_notes: row.try_get("reconciliation_notes")?,
            auto_closed: row.try_get("auto_closed")?,
            notes: row.try_get("notes")?,
            version: row.try_get("version")?,
        })
    }
}
