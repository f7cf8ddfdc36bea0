use attendance_core_db::models::site::SitePolicyModel;
use rust_decimal::Decimal;

use super::buckets::DayBuckets;

/// Working days per month behind the overtime hourly rate
pub const OVERTIME_RATE_DAYS: i64 = 26;

/// Money fields of a salary record, rounded to 2 dp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryAmounts {
    pub per_day_amount: Decimal,
    pub earnings: Decimal,
    pub absence_deduction: Decimal,
    pub total_deductions: Decimal,
    pub overtime_amount: Decimal,
    pub total_bonuses: Decimal,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
}

/// `overtime_hours × base / (working_hours_per_day × 26) × multiplier`,
/// zero when overtime is disabled
pub fn overtime_amount(policy: &SitePolicyModel, base_salary: Decimal, overtime_hours: Decimal) -> Decimal {
    let monthly_hours = policy.working_hours_per_day * Decimal::from(OVERTIME_RATE_DAYS);
    if !policy.overtime.enabled || monthly_hours.is_zero() {
        return Decimal::ZERO;
    }
    (overtime_hours * base_salary / monthly_hours * policy.overtime.multiplier).round_dp(2)
}

/// Full-precision arithmetic; only the results are rounded.
///
/// `month_working_days` must be positive.
pub fn compute_amounts(
    base_salary: Decimal,
    month_working_days: i32,
    buckets: &DayBuckets,
    overtime_amount: Decimal,
    other_deductions: Decimal,
    other_bonuses: Decimal,
) -> SalaryAmounts {
    let per_day = if month_working_days > 0 {
        base_salary / Decimal::from(month_working_days)
    } else {
        Decimal::ZERO
    };

    let credited_days = Decimal::from(buckets.present + buckets.paid_leave + buckets.holiday);
    let half_days = Decimal::from(buckets.half);
    let earnings = (per_day * credited_days + per_day / Decimal::TWO * half_days).min(base_salary);

    let absence_deduction = per_day * Decimal::from(buckets.absent + buckets.unpaid_leave);
    let total_deductions = absence_deduction + other_deductions;
    let total_bonuses = overtime_amount + other_bonuses;
    let gross_salary = earnings + total_bonuses;
    let net_salary = (earnings - total_deductions + total_bonuses).max(Decimal::ZERO);

    SalaryAmounts {
        per_day_amount: per_day.round_dp(2),
        earnings: earnings.round_dp(2),
        absence_deduction: absence_deduction.round_dp(2),
        total_deductions: total_deductions.round_dp(2),
        overtime_amount: overtime_amount.round_dp(2),
        total_bonuses: total_bonuses.round_dp(2),
        gross_salary: gross_salary.round_dp(2),
        net_salary: net_salary.round_dp(2),
    }
}
