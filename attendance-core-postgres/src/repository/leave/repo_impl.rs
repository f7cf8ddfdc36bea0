use attendance_core_db::models::leave::LeaveApplicationModel;
use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct LeaveRepositoryImpl {
    pub executor: Executor,
}

impl LeaveRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub(super) fn rows_to_models(rows: Vec<PgRow>) -> Result<Vec<LeaveApplicationModel>, Box<dyn Error + Send + Sync>> {
        let mut leaves = Vec::with_capacity(rows.len());
        for row in rows {
            leaves.push(LeaveApplicationModel::try_from_row(&row)?);
        }
        Ok(leaves)
    }
}

impl TryFromRow<PgRow> for LeaveApplicationModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(LeaveApplicationModel {
            id: row.try_get("id")?,
            worker_id: row.try_get("worker_id")?,
            site_id: row.try_get("site_id")?,
            leave_type: row.try_get("leave_type")?,
            from_date: row.try_get("from_date")?,
            to_date: row.try_get("to_date")?,
            reason: get_heapless_string(row, "reason")?,
            status: row.try_get("status")?,
            is_paid: row.try_get("is_paid")?,
            total_days: row.try_get("total_days")?,
            early_return: row.try_get("early_return")?,
            actual_return_date: row.try_get("actual_return_date")?,
            applied_at: row.try_get("applied_at")?,
            decided_by: row.try_get("decided_by")?,
            decided_at: row.try_get("decided_at")?,
            decision_notes: row.try_get("decision_notes")?,
        })
    }
}
