use attendance_core_api::{
    ApiError, ApiResult, BatchItemFailure, PaymentDetails, PayrollPeriod, SalaryEditRequest,
};
use attendance_core_db::models::salary::{SalaryEdit, SalaryRecordModel};
use attendance_core_db::models::worker::WorkerModel;
use attendance_core_db::repository::{
    FindApprovedLeaves, FindBySite, FindDay, FindSalaryRecord, Load, SaveSalaryRecord,
};
use rust_decimal::Decimal;
use sqlx::Database;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::amounts::{compute_amounts, overtime_amount, SalaryAmounts};
use super::buckets::{classify_days, DayBuckets};
use super::window::pay_window;
use crate::clock::Clock;
use crate::locks::KeyedLocks;
use crate::policy::{month_working_days, SitePolicyProvider};
use crate::stores::Stores;

/// Outcome of a site-wide calculation; one worker's failure never aborts
/// the others
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryBatchResult {
    pub records: Vec<SalaryRecordModel>,
    pub failures: Vec<BatchItemFailure>,
}

/// Calculates and maintains monthly salary records.
///
/// Calculations of one (worker, year, month) are serialized in process and,
/// where the store supports it, across processes. Every write is a
/// compare-and-swap on the record hash.
pub struct PayrollEngine<DB: Database> {
    stores: Stores<DB>,
    policies: Arc<SitePolicyProvider<DB>>,
    clock: Arc<dyn Clock>,
    locks: KeyedLocks<(Uuid, i32, u32)>,
}

impl<DB: Database> PayrollEngine<DB> {
    pub fn new(stores: Stores<DB>, policies: Arc<SitePolicyProvider<DB>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores,
            policies,
            clock,
            locks: KeyedLocks::new(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn calculate_monthly_salary(&self, worker_id: Uuid, period: PayrollPeriod) -> ApiResult<SalaryRecordModel> {
        period.validate()?;
        let worker = self
            .stores
            .workers
            .load(worker_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("worker {worker_id}")))?;
        self.calculate_for(&worker, period).await
    }

    /// Calculate every worker of a site employed during the month
    #[tracing::instrument(skip(self))]
    pub async fn calculate_bulk_salary(&self, site_id: Uuid, period: PayrollPeriod) -> ApiResult<SalaryBatchResult> {
        period.validate()?;
        let workers = self.stores.workers.find_by_site(site_id, None).await?;

        let mut result = SalaryBatchResult::default();
        for worker in &workers {
            match self.calculate_for(worker, period).await {
                Ok(record) => result.records.push(record),
                Err(err) => {
                    warn!(worker_id = %worker.id, error = %err, "salary calculation failed");
                    result.failures.push(BatchItemFailure {
                        item_id: worker.id,
                        date: None,
                        error: err.to_string(),
                    });
                }
            }
        }
        info!(
            %site_id,
            calculated = result.records.len(),
            failed = result.failures.len(),
            "bulk salary calculation finished"
        );
        Ok(result)
    }

    /// Re-derive an existing unpaid record from current attendance and leave
    pub async fn recalculate_salary(&self, record_id: Uuid) -> ApiResult<SalaryRecordModel> {
        let record = self.load_record(record_id).await?;
        if record.is_paid {
            return Err(already_paid(&record));
        }
        let period = period_of(&record)?;
        self.calculate_monthly_salary(record.worker_id, period).await
    }

    /// Manual adjustments to an unpaid record. The before/after diff lands in
    /// the edit history and the totals are recomputed.
    pub async fn edit_salary_record(
        &self,
        record_id: Uuid,
        edit: &SalaryEditRequest,
        editor_id: Uuid,
        reason: &str,
    ) -> ApiResult<SalaryRecordModel> {
        edit.validate()?;
        let peek = self.load_record(record_id).await?;
        let _guard = self.locks.lock((peek.worker_id, peek.year, month_of(&peek)?)).await;

        let before = self.load_record(record_id).await?;
        if before.is_paid {
            return Err(already_paid(&before));
        }

        let mut after = before.clone();
        if let Some(other_deductions) = edit.other_deductions {
            after.other_deductions = other_deductions.round_dp(2);
        }
        if let Some(other_bonuses) = edit.other_bonuses {
            after.other_bonuses = other_bonuses.round_dp(2);
        }
        if let Some(notes) = &edit.notes {
            after.notes = Some(notes.clone());
        }
        let amounts = compute_amounts(
            after.base_salary,
            after.month_working_days,
            &DayBuckets::from_record(&after),
            after.overtime_amount,
            after.other_deductions,
            after.other_bonuses,
        );
        apply_amounts(&mut after, &amounts);

        self.commit_change(before, after, editor_id, reason).await
    }

    /// Mark a record as paid. From here on only payment fields may change.
    pub async fn record_payment(
        &self,
        record_id: Uuid,
        details: &PaymentDetails,
        editor_id: Uuid,
    ) -> ApiResult<SalaryRecordModel> {
        details.validate()?;
        let peek = self.load_record(record_id).await?;
        let _guard = self.locks.lock((peek.worker_id, peek.year, month_of(&peek)?)).await;

        let before = self.load_record(record_id).await?;
        if before.is_paid {
            return Err(already_paid(&before));
        }
        let mut after = before.clone();
        after.is_paid = true;
        after.paid_at = Some(details.paid_at.unwrap_or_else(|| self.clock.now()));
        apply_payment_details(&mut after, details);

        self.commit_change(before, after, editor_id, "Payment recorded").await
    }

    /// Change payment metadata or ledger linkage, paid or not
    pub async fn update_payment_details(
        &self,
        record_id: Uuid,
        details: &PaymentDetails,
        editor_id: Uuid,
        reason: &str,
    ) -> ApiResult<SalaryRecordModel> {
        details.validate()?;
        let peek = self.load_record(record_id).await?;
        let _guard = self.locks.lock((peek.worker_id, peek.year, month_of(&peek)?)).await;

        let before = self.load_record(record_id).await?;
        let mut after = before.clone();
        if let Some(paid_at) = details.paid_at {
            after.paid_at = Some(paid_at);
        }
        apply_payment_details(&mut after, details);

        self.commit_change(before, after, editor_id, reason).await
    }

    async fn calculate_for(&self, worker: &WorkerModel, period: PayrollPeriod) -> ApiResult<SalaryRecordModel> {
        let _guard = self.locks.lock((worker.id, period.year, period.month)).await;
        let month = period.month as i32;
        self.stores
            .salaries
            .lock_salary_period(worker.id, period.year, month)
            .await?;

        let existing = self
            .stores
            .salaries
            .find_salary_record(worker.id, period.year, month)
            .await?;
        if let Some(record) = existing.as_ref().filter(|record| record.is_paid) {
            return Err(already_paid(record));
        }

        let record = self.build_record(worker, period, existing.as_ref()).await?;
        let saved = match &existing {
            Some(previous) => self.stores.salaries.update_salary_record(&record, previous.hash).await?,
            None => self.stores.salaries.insert_salary_record(&record).await?,
        };
        info!(
            worker_id = %worker.id,
            %period,
            net_salary = %saved.net_salary,
            "salary calculated"
        );
        Ok(saved)
    }

    async fn build_record(
        &self,
        worker: &WorkerModel,
        period: PayrollPeriod,
        existing: Option<&SalaryRecordModel>,
    ) -> ApiResult<SalaryRecordModel> {
        let now = self.clock.now();
        let window = pay_window(worker, period, self.clock.today())?;
        let policy = self.policies.load(worker.site_id).await?;

        let days = self
            .stores
            .attendance
            .find_days_in_range(worker.id, window.start, window.end)
            .await?;
        let leaves = self
            .stores
            .leaves
            .find_approved_for_worker(worker.id, window.start, window.end)
            .await?;
        let buckets = classify_days(&days, &leaves, &window, &policy);
        if !buckets.has_data() {
            return Err(ApiError::NoData(format!(
                "no attendance or leave for worker {} between {} and {}",
                worker.id, window.start, window.end
            )));
        }
        debug!(worker_id = %worker.id, payable_days = window.days(), ?buckets, "days classified");

        let working_days = month_working_days(&policy, period.year, period.month);
        let overtime = overtime_amount(&policy, worker.base_salary, buckets.overtime_hours);
        let other_deductions = existing.map(|r| r.other_deductions).unwrap_or(Decimal::ZERO);
        let other_bonuses = existing.map(|r| r.other_bonuses).unwrap_or(Decimal::ZERO);
        let amounts = compute_amounts(
            worker.base_salary,
            working_days,
            &buckets,
            overtime,
            other_deductions,
            other_bonuses,
        );

        let mut record = SalaryRecordModel {
            id: existing.map(|r| r.id).unwrap_or_else(Uuid::new_v4),
            worker_id: worker.id,
            site_id: worker.site_id,
            year: period.year,
            month: period.month as i32,
            working_start_date: window.start,
            working_end_date: window.end,
            month_working_days: working_days,
            present_days: buckets.present,
            absent_days: buckets.absent,
            half_days: buckets.half,
            paid_leave_days: buckets.paid_leave,
            unpaid_leave_days: buckets.unpaid_leave,
            holiday_days: buckets.holiday,
            late_days: buckets.late,
            early_leave_days: buckets.early_leave,
            total_hours: buckets.total_hours.round_dp(2),
            overtime_hours: buckets.overtime_hours.round_dp(2),
            base_salary: worker.base_salary,
            per_day_amount: Decimal::ZERO,
            earnings: Decimal::ZERO,
            absence_deduction: Decimal::ZERO,
            other_deductions,
            total_deductions: Decimal::ZERO,
            overtime_amount: Decimal::ZERO,
            other_bonuses,
            total_bonuses: Decimal::ZERO,
            gross_salary: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            is_paid: false,
            paid_at: None,
            payment_method: existing.and_then(|r| r.payment_method.clone()),
            payment_reference: existing.and_then(|r| r.payment_reference.clone()),
            external_ledger_id: existing.and_then(|r| r.external_ledger_id.clone()),
            notes: existing.and_then(|r| r.notes.clone()),
            edit_history: existing.map(|r| r.edit_history.clone()).unwrap_or_default(),
            calculated_at: now,
            updated_at: now,
            antecedent_hash: existing.map(|r| r.hash).unwrap_or(0),
            hash: 0,
        };
        apply_amounts(&mut record, &amounts);
        record.hash = record.compute_hash().map_err(ApiError::InternalError)?;
        Ok(record)
    }

    /// Append the diff to the edit history, re-hash and compare-and-swap.
    /// A paid record may only differ in payment fields.
    async fn commit_change(
        &self,
        before: SalaryRecordModel,
        mut after: SalaryRecordModel,
        editor_id: Uuid,
        reason: &str,
    ) -> ApiResult<SalaryRecordModel> {
        if before.is_paid {
            let locked = SalaryRecordModel::non_payment_changes(&before, &after);
            if !locked.is_empty() {
                return Err(ApiError::Conflict(format!(
                    "salary record {} is paid; cannot change {}",
                    before.id,
                    locked.join(", ")
                )));
            }
        }

        let changes = SalaryRecordModel::diff(&before, &after);
        if changes.is_empty() {
            return Ok(before);
        }

        let now = self.clock.now();
        after.edit_history.push(SalaryEdit {
            editor_id,
            edited_at: now,
            reason: reason.to_string(),
            changes,
        });
        after.updated_at = now;
        after.antecedent_hash = before.hash;
        after.hash = after.compute_hash().map_err(ApiError::InternalError)?;

        let saved = self.stores.salaries.update_salary_record(&after, before.hash).await?;
        info!(record_id = %saved.id, %editor_id, reason, "salary record changed");
        Ok(saved)
    }

    async fn load_record(&self, record_id: Uuid) -> ApiResult<SalaryRecordModel> {
        self.stores
            .salaries
            .load(record_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("salary record {record_id}")))
    }
}

fn apply_amounts(record: &mut SalaryRecordModel, amounts: &SalaryAmounts) {
    record.per_day_amount = amounts.per_day_amount;
    record.earnings = amounts.earnings;
    record.absence_deduction = amounts.absence_deduction;
    record.total_deductions = amounts.total_deductions;
    record.overtime_amount = amounts.overtime_amount;
    record.total_bonuses = amounts.total_bonuses;
    record.gross_salary = amounts.gross_salary;
    record.net_salary = amounts.net_salary;
}

fn apply_payment_details(record: &mut SalaryRecordModel, details: &PaymentDetails) {
    if let Some(method) = &details.payment_method {
        record.payment_method = Some(method.clone());
    }
    if let Some(reference) = &details.payment_reference {
        record.payment_reference = Some(reference.clone());
    }
    if let Some(ledger_id) = &details.external_ledger_id {
        record.external_ledger_id = Some(ledger_id.clone());
    }
}

fn already_paid(record: &SalaryRecordModel) -> ApiError {
    ApiError::Conflict(format!(
        "salary for worker {} {}-{:02} is already paid",
        record.worker_id, record.year, record.month
    ))
}

fn month_of(record: &SalaryRecordModel) -> ApiResult<u32> {
    u32::try_from(record.month).map_err(|_| ApiError::InternalError(format!("invalid month {}", record.month)))
}

fn period_of(record: &SalaryRecordModel) -> ApiResult<PayrollPeriod> {
    Ok(PayrollPeriod {
        year: record.year,
        month: month_of(record)?,
    })
}
