use attendance_core_api::AttendanceStatus;
use attendance_core_db::models::attendance::AttendanceDayModel;
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::models::salary::SalaryRecordModel;
use attendance_core_db::models::site::SitePolicyModel;
use rust_decimal::Decimal;
use std::collections::HashSet;

use super::window::PayWindow;

/// Mutually exclusive day classifications of one payable window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBuckets {
    pub present: i32,
    pub absent: i32,
    pub half: i32,
    pub paid_leave: i32,
    pub unpaid_leave: i32,
    pub holiday: i32,
    /// Quality flags on present days, not buckets of their own
    pub late: i32,
    pub early_leave: i32,
    pub total_hours: Decimal,
    pub overtime_hours: Decimal,
    pub attendance_rows: usize,
    /// Leave days added without an attendance row
    pub leave_only_days: usize,
}

impl DayBuckets {
    /// Leave rows alone satisfy the data requirement
    pub fn has_data(&self) -> bool {
        self.attendance_rows > 0 || self.leave_only_days > 0
    }

    pub fn from_record(record: &SalaryRecordModel) -> Self {
        Self {
            present: record.present_days,
            absent: record.absent_days,
            half: record.half_days,
            paid_leave: record.paid_leave_days,
            unpaid_leave: record.unpaid_leave_days,
            holiday: record.holiday_days,
            late: record.late_days,
            early_leave: record.early_leave_days,
            total_hours: record.total_hours,
            overtime_hours: record.overtime_hours,
            attendance_rows: 0,
            leave_only_days: 0,
        }
    }
}

/// Bucket every attendance row of the window, then the approved leave days
/// that have no row. An on-leave row whose leave cannot be resolved counts
/// as unpaid.
pub fn classify_days(
    days: &[AttendanceDayModel],
    leaves: &[LeaveApplicationModel],
    window: &PayWindow,
    policy: &SitePolicyModel,
) -> DayBuckets {
    let mut buckets = DayBuckets::default();
    let mut covered = HashSet::new();

    for day in days.iter().filter(|day| window.contains(day.date)) {
        if !covered.insert(day.date) {
            continue;
        }
        buckets.attendance_rows += 1;
        match day.status {
            AttendanceStatus::Present => buckets.present += 1,
            AttendanceStatus::Late => {
                buckets.present += 1;
                buckets.late += 1;
            }
            AttendanceStatus::EarlyLeave => {
                buckets.present += 1;
                buckets.early_leave += 1;
            }
            AttendanceStatus::HalfDay => buckets.half += 1,
            AttendanceStatus::Absent => buckets.absent += 1,
            AttendanceStatus::Holiday => buckets.holiday += 1,
            AttendanceStatus::OnLeave => {
                let paid = day
                    .leave_id
                    .and_then(|id| leaves.iter().find(|leave| leave.id == id))
                    .map(|leave| leave.counts_as_paid())
                    .unwrap_or(false);
                if paid {
                    buckets.paid_leave += 1;
                } else {
                    buckets.unpaid_leave += 1;
                }
            }
        }

        buckets.total_hours += day.total_hours;
        if policy.overtime.enabled && day.total_hours > policy.overtime.threshold_hours {
            buckets.overtime_hours += day.total_hours - policy.overtime.threshold_hours;
        }
    }

    for leave in leaves.iter().filter(|leave| leave.is_approved()) {
        let from = leave.from_date.max(window.start);
        let to = leave.effective_to_date().min(window.end);
        for date in from.iter_days().take_while(|date| *date <= to) {
            if !covered.insert(date) {
                continue;
            }
            buckets.leave_only_days += 1;
            if leave.counts_as_paid() {
                buckets.paid_leave += 1;
            } else {
                buckets.unpaid_leave += 1;
            }
        }
    }

    buckets
}
