use attendance_core_api::{Direction, EmploymentStatus};
use chrono::{NaiveDate, NaiveDateTime};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Database model for a staff member tracked for attendance and payroll.
/// Never deleted; leaving staff are set to `Inactive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerModel {
    pub id: Uuid,
    pub site_id: Uuid,
    pub display_name: HeaplessString<100>,
    pub employment_status: EmploymentStatus,
    /// Direction of the last admitted entry
    pub current_direction: Direction,
    pub last_check_in: Option<NaiveDateTime>,
    pub last_check_out: Option<NaiveDateTime>,
    /// Monthly base salary
    pub base_salary: Decimal,
    pub joining_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
}

impl WorkerModel {
    pub fn is_active(&self) -> bool {
        self.employment_status == EmploymentStatus::Active
    }

    /// Whether the worker was on the payroll at any point in [start, end]
    pub fn employed_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.joining_date <= end && self.exit_date.map(|exit| exit >= start).unwrap_or(true)
    }
}

impl Identifiable for WorkerModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
