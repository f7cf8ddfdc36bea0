use attendance_core_db::models::worker::WorkerModel;
use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct WorkerRepositoryImpl {
    pub executor: Executor,
}

impl WorkerRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for WorkerModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(WorkerModel {
            id: row.try_get("id")?,
            site_id: row.try_get("site_id")?,
            display_name: get_heapless_string(row, "display_name")?,
            employment_status: row.try_get("employment_status")?,
            current_direction: row.try_get("current_direction")?,
            last_check_in: row.try_get("last_check_in")?,
            last_check_out: row.try_get("last_check_out")?,
            base_salary: row.try_get("base_salary")?,
            joining_date: row.try_get("joining_date")?,
            exit_date: row.try_get("exit_date")?,
        })
    }
}
