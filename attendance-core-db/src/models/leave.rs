use attendance_core_api::{LeaveStatus, LeaveType};
use chrono::{NaiveDate, NaiveDateTime};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Database model for a leave application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplicationModel {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub site_id: Uuid,
    pub leave_type: LeaveType,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: HeaplessString<255>,
    pub status: LeaveStatus,
    pub is_paid: bool,
    /// Inclusive day count of the effective range
    pub total_days: i32,
    pub early_return: bool,
    /// First day back at work when the worker returned early
    pub actual_return_date: Option<NaiveDate>,
    pub applied_at: NaiveDateTime,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<NaiveDateTime>,
    pub decision_notes: Option<String>,
}

impl LeaveApplicationModel {
    /// Inclusive number of days between two dates, zero when inverted
    pub fn inclusive_days(from: NaiveDate, to: NaiveDate) -> i32 {
        if to < from {
            return 0;
        }
        ((to - from).num_days() + 1) as i32
    }

    /// Last day actually spent on leave, accounting for an early return
    pub fn effective_to_date(&self) -> NaiveDate {
        match (self.early_return, self.actual_return_date) {
            (true, Some(returned)) => returned.pred_opt().unwrap_or(self.from_date).max(self.from_date),
            _ => self.to_date,
        }
    }

    pub fn recompute_total_days(&mut self) {
        self.total_days = Self::inclusive_days(self.from_date, self.effective_to_date());
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Whether an approved leave keeps the worker away on `date`
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.is_approved() && self.from_date <= date && date <= self.effective_to_date()
    }

    /// Paid when flagged so, or when the leave type is paid by default
    pub fn counts_as_paid(&self) -> bool {
        self.is_paid || self.leave_type.is_paid_by_default()
    }
}

impl Identifiable for LeaveApplicationModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
