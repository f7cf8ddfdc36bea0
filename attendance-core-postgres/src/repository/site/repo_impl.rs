use attendance_core_db::models::site::SitePolicyModel;
use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_json, get_optional_json, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct SitePolicyRepositoryImpl {
    pub executor: Executor,
}

impl SitePolicyRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for SitePolicyModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(SitePolicyModel {
            site_id: row.try_get("site_id")?,
            site_name: get_heapless_string(row, "site_name")?,
            working_hours_per_day: row.try_get("working_hours_per_day")?,
            half_day_threshold_hours: row.try_get("half_day_threshold_hours")?,
            check_in_time: row.try_get("check_in_time")?,
            check_out_time: row.try_get("check_out_time")?,
            late_threshold_minutes: row.try_get("late_threshold_minutes")?,
            early_leave_threshold_minutes: row.try_get("early_leave_threshold_minutes")?,
            weekend_days: get_json(row, "weekend_days")?,
            holidays: get_json(row, "holidays")?,
            overtime: get_json(row, "overtime")?,
            auto_close_enabled: row.try_get("auto_close_enabled")?,
            last_auto_close: get_optional_json(row, "last_auto_close")?,
        })
    }
}
