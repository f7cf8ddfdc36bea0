use attendance_core_api::AttendanceStatus;
use attendance_core_db::models::attendance::AttendanceDayModel;
use attendance_core_db::models::site::SitePolicyModel;
use rust_decimal::Decimal;

use crate::policy::{early_leave_minutes, late_minutes};

/// Facts a day's status is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInput {
    pub hours: Decimal,
    pub is_late: bool,
    pub is_early_leave: bool,
    pub has_approved_leave: bool,
    pub has_entries: bool,
}

/// Exactly one terminal status per input.
///
/// Precedence: approved leave, then absence, then insufficient hours, then
/// late over early leave over present.
pub fn classify_status(input: &StatusInput, policy: &SitePolicyModel) -> AttendanceStatus {
    if input.has_approved_leave {
        return AttendanceStatus::OnLeave;
    }
    if !input.has_entries && input.hours.is_zero() {
        return AttendanceStatus::Absent;
    }
    if input.hours < policy.half_day_threshold_hours {
        return AttendanceStatus::HalfDay;
    }
    if input.is_late {
        AttendanceStatus::Late
    } else if input.is_early_leave {
        AttendanceStatus::EarlyLeave
    } else {
        AttendanceStatus::Present
    }
}

/// Hours of completed IN→OUT pairs, rounded to 2 dp
pub fn worked_hours(day: &AttendanceDayModel) -> Decimal {
    (Decimal::from(day.worked_minutes()) / Decimal::new(60, 0)).round_dp(2)
}

/// Refresh every field derived from `entries`. Returns whether anything changed.
pub fn recompute_day(day: &mut AttendanceDayModel, policy: &SitePolicyModel) -> bool {
    let check_in_time = day.first_check_in();
    let check_out_time = day.last_check_out();
    let total_hours = worked_hours(day);
    let is_late = check_in_time.and_then(|ts| late_minutes(policy, ts)).is_some();
    let is_early_leave = check_out_time.and_then(|ts| early_leave_minutes(policy, ts)).is_some();
    let status = classify_status(
        &StatusInput {
            hours: total_hours,
            is_late,
            is_early_leave,
            has_approved_leave: day.leave_id.is_some(),
            has_entries: day.has_entries(),
        },
        policy,
    );

    let changed = day.check_in_time != check_in_time
        || day.check_out_time != check_out_time
        || day.total_hours != total_hours
        || day.is_late != is_late
        || day.is_early_leave != is_early_leave
        || day.status != status;

    day.check_in_time = check_in_time;
    day.check_out_time = check_out_time;
    day.total_hours = total_hours;
    day.is_late = is_late;
    day.is_early_leave = is_early_leave;
    day.status = status;
    changed
}
