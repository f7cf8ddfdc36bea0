use async_trait::async_trait;
use attendance_core_api::ApiError;
use attendance_core_db::models::salary::SalaryRecordModel;
use attendance_core_db::repository::save_salary_record::SaveSalaryRecord;
use crate::executor::ExecutorError;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SalaryRecordRepositoryImpl;

/// Every column but `id`, in the order `bind_columns` binds them
const COLUMNS: &str = "worker_id, site_id, year, month, working_start_date, working_end_date, \
    month_working_days, present_days, absent_days, half_days, paid_leave_days, unpaid_leave_days, \
    holiday_days, late_days, early_leave_days, total_hours, overtime_hours, base_salary, \
    per_day_amount, earnings, absence_deduction, other_deductions, total_deductions, \
    overtime_amount, other_bonuses, total_bonuses, gross_salary, net_salary, is_paid, paid_at, \
    payment_method, payment_reference, external_ledger_id, notes, edit_history, calculated_at, \
    updated_at, antecedent_hash, hash";

const COLUMN_COUNT: usize = 39;

/// `$from, $from+1, ...` for every entry of `COLUMNS`
fn placeholders(from: usize) -> String {
    (from..from + COLUMN_COUNT)
        .map(|n| format!("${n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bind_columns<'q>(
    query: Query<'q, Postgres, PgArguments>,
    r: &'q SalaryRecordModel,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(r.worker_id)
        .bind(r.site_id)
        .bind(r.year)
        .bind(r.month)
        .bind(r.working_start_date)
        .bind(r.working_end_date)
        .bind(r.month_working_days)
        .bind(r.present_days)
        .bind(r.absent_days)
        .bind(r.half_days)
        .bind(r.paid_leave_days)
        .bind(r.unpaid_leave_days)
        .bind(r.holiday_days)
        .bind(r.late_days)
        .bind(r.early_leave_days)
        .bind(r.total_hours)
        .bind(r.overtime_hours)
        .bind(r.base_salary)
        .bind(r.per_day_amount)
        .bind(r.earnings)
        .bind(r.absence_deduction)
        .bind(r.other_deductions)
        .bind(r.total_deductions)
        .bind(r.overtime_amount)
        .bind(r.other_bonuses)
        .bind(r.total_bonuses)
        .bind(r.gross_salary)
        .bind(r.net_salary)
        .bind(r.is_paid)
        .bind(r.paid_at)
        .bind(r.payment_method.as_deref())
        .bind(r.payment_reference.as_deref())
        .bind(r.external_ledger_id.as_deref())
        .bind(r.notes.as_deref())
        .bind(Json(&r.edit_history))
        .bind(r.calculated_at)
        .bind(r.updated_at)
        .bind(r.antecedent_hash)
        .bind(r.hash)
}

impl SalaryRecordRepositoryImpl {
    pub(super) async fn insert_salary_record_impl(
        repo: &SalaryRecordRepositoryImpl,
        record: &SalaryRecordModel,
    ) -> Result<SalaryRecordModel, Box<dyn Error + Send + Sync>> {
        let query = format!(
            "INSERT INTO salary_record (id, {COLUMNS}) VALUES ($1, {}) \
             ON CONFLICT (worker_id, year, month) DO NOTHING",
            placeholders(2)
        );
        let result = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            bind_columns(sqlx::query(&query).bind(record.id), record)
                .execute(&mut **transaction)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(Box::new(ApiError::Conflict(format!(
                "salary record of worker {} for {}-{:02} already exists",
                record.worker_id, record.year, record.month
            ))));
        }
        Ok(record.clone())
    }

    pub(super) async fn update_salary_record_impl(
        repo: &SalaryRecordRepositoryImpl,
        record: &SalaryRecordModel,
        expected_hash: i64,
    ) -> Result<SalaryRecordModel, Box<dyn Error + Send + Sync>> {
        let query = format!(
            "UPDATE salary_record SET ({COLUMNS}) = ({}) WHERE id = $1 AND hash = ${}",
            placeholders(2),
            COLUMN_COUNT + 2
        );
        let result = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            bind_columns(sqlx::query(&query).bind(record.id), record)
                .bind(expected_hash)
                .execute(&mut **transaction)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(Box::new(ApiError::Conflict(format!(
                "salary record {} changed since it was read",
                record.id
            ))));
        }
        Ok(record.clone())
    }

    pub(super) async fn lock_salary_period_impl(
        repo: &SalaryRecordRepositoryImpl,
        worker_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Released when the session transaction ends
        let key = format!("salary:{worker_id}:{year}:{month}");
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(key)
            .execute(&mut **transaction)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SaveSalaryRecord<Postgres> for SalaryRecordRepositoryImpl {
    async fn insert_salary_record(
        &self,
        record: &SalaryRecordModel,
    ) -> Result<SalaryRecordModel, Box<dyn Error + Send + Sync>> {
        Self::insert_salary_record_impl(self, record).await
    }

    async fn update_salary_record(
        &self,
        record: &SalaryRecordModel,
        expected_hash: i64,
    ) -> Result<SalaryRecordModel, Box<dyn Error + Send + Sync>> {
        Self::update_salary_record_impl(self, record, expected_hash).await
    }

    async fn lock_salary_period(
        &self,
        worker_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Self::lock_salary_period_impl(self, worker_id, year, month).await
    }
}
