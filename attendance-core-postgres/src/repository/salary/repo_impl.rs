use attendance_core_db::models::salary::SalaryRecordModel;
use crate::executor::Executor;
use crate::utils::{get_json, TryFromRow};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct SalaryRecordRepositoryImpl {
    pub executor: Executor,
}

impl SalaryRecordRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for SalaryRecordModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(SalaryRecordModel {
            id: row.try_get("id")?,
            worker_id: row.try_get("worker_id")?,
            site_id: row.try_get("site_id")?,
            year: row.try_get("year")?,
            month: row.try_get("month")?,
            working_start_date: row.try_get("working_start_date")?,
            working_end_date: row.try_get("working_end_date")?,
            month_working_days: row.try_get("month_working_days")?,
            present_days: row.try_get("present_days")?,
            absent_days: row.try_get("absent_days")?,
            half_days: row.try_get("half_days")?,
            paid_leave_days: row.try_get("paid_leave_days")?,
            unpaid_leave_days: row.try_get("unpaid_leave_days")?,
            holiday_days: row.try_get("holiday_days")?,
            late_days: row.try_get("late_days")?,
            early_leave_days: row.try_get("early_leave_days")?,
            total_hours: row.try_get("total_hours")?,
            overtime_hours: row.try_get("overtime_hours")?,
            base_salary: row.try_get("base_salary")?,
            per_day_amount: row.try_get("per_day_amount")?,
            earnings: row.try_get("earnings")?,
            absence_deduction: row.try_get("absence_deduction")?,
            other_deductions: row.try_get("other_deductions")?,
            total_deductions: row.try_get("total_deductions")?,
            overtime_amount: row.try_get("overtime_amount")?,
            other_bonuses: row.try_get("other_bonuses")?,
            total_bonuses: row.try_get("total_bonuses")?,
            gross_salary: row.try_get("gross_salary")?,
            net_salary: row.try_get("net_salary")?,
            is_paid: row.try_get("is_paid")?,
            paid_at: row.try_get("paid_at")?,
            payment_method: row.try_get("payment_method")?,
            payment_reference: row.try_get("payment_reference")?,
            external_ledger_id: row.try_get("external_ledger_id")?,
            notes: row.try_get("notes")?,
            edit_history: get_json(row, "edit_history")?,
            calculated_at: row.try_get("calculated_at")?,
            updated_at: row.try_get("updated_at")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            hash: row.try_get("hash")?,
        })
    }
}
