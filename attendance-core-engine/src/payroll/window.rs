use attendance_core_api::{ApiError, ApiResult, PayrollPeriod};
use attendance_core_db::models::worker::WorkerModel;
use chrono::NaiveDate;

use crate::policy::{first_day_of_month, last_day_of_month};

/// Inclusive range of payable days within one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PayWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// The month clipped to today, to the joining date and to the exit date
pub fn pay_window(worker: &WorkerModel, period: PayrollPeriod, today: NaiveDate) -> ApiResult<PayWindow> {
    let (month_start, month_end) = first_day_of_month(period.year, period.month)
        .zip(last_day_of_month(period.year, period.month))
        .ok_or_else(|| ApiError::InvalidInput(format!("invalid payroll period {period}")))?;

    let start = month_start.max(worker.joining_date);
    let end = match worker.exit_date {
        Some(exit) => month_end.min(today).min(exit),
        None => month_end.min(today),
    };
    if start > end {
        return Err(ApiError::NotWorkingThisMonth(format!(
            "worker {} has no payable days in {}",
            worker.id, period
        )));
    }
    Ok(PayWindow { start, end })
}
