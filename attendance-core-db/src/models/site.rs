use attendance_core_api::{AutoCloseSummary, Weekday};
use chrono::{NaiveDate, NaiveTime};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: HeaplessString<50>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRules {
    pub enabled: bool,
    /// Daily hours after which overtime starts
    pub threshold_hours: Decimal,
    pub multiplier: Decimal,
}

/// Per-site schedule and thresholds.
///
/// # Documentation
/// - Read-mostly; administrative tooling writes it.
/// - The core writes only `last_auto_close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePolicyModel {
    pub site_id: Uuid,
    pub site_name: HeaplessString<100>,
    pub working_hours_per_day: Decimal,
    /// Days with fewer worked hours than this are half days
    pub half_day_threshold_hours: Decimal,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
    pub late_threshold_minutes: i32,
    pub early_leave_threshold_minutes: i32,
    pub weekend_days: Vec<Weekday>,
    pub holidays: Vec<Holiday>,
    pub overtime: OvertimeRules,
    pub auto_close_enabled: bool,
    pub last_auto_close: Option<AutoCloseSummary>,
}

impl Identifiable for SitePolicyModel {
    fn get_id(&self) -> Uuid {
        self.site_id
    }
}
