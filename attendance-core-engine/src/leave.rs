use attendance_core_api::{ApiError, ApiResult, LeaveRequest, LeaveStatus};
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::repository::{CreateBatch, Load, UpdateBatch};
use chrono::NaiveDate;
use heapless::String as HeaplessString;
use sqlx::Database;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::stores::Stores;

/// Leave application workflow.
///
/// pending -> approved | rejected | cancelled, and approved -> cancelled.
/// Rejected and cancelled are terminal. An approved leave may also record an
/// early return, which shortens its effective range.
pub struct LeaveService<DB: Database> {
    stores: Stores<DB>,
    clock: Arc<dyn Clock>,
}

impl<DB: Database> LeaveService<DB> {
    pub fn new(stores: Stores<DB>, clock: Arc<dyn Clock>) -> Self {
        Self { stores, clock }
    }

    pub async fn apply(&self, request: &LeaveRequest) -> ApiResult<LeaveApplicationModel> {
        request.validate()?;
        let worker = self
            .stores
            .workers
            .load(request.worker_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("worker {}", request.worker_id)))?;
        if !worker.is_active() {
            return Err(ApiError::ValidationRejected(format!(
                "worker {} is {} and cannot apply for leave",
                worker.id, worker.employment_status
            )));
        }
        let reason = HeaplessString::try_from(request.reason.as_str())
            .map_err(|_| ApiError::InvalidInput("reason is too long".to_string()))?;

        let leave = LeaveApplicationModel {
            id: Uuid::new_v4(),
            worker_id: worker.id,
            site_id: worker.site_id,
            leave_type: request.leave_type,
            from_date: request.from_date,
            to_date: request.to_date,
            reason,
            status: LeaveStatus::Pending,
            is_paid: request.is_paid,
            total_days: LeaveApplicationModel::inclusive_days(request.from_date, request.to_date),
            early_return: false,
            actual_return_date: None,
            applied_at: self.clock.now(),
            decided_by: None,
            decided_at: None,
            decision_notes: None,
        };
        let mut created = self.stores.leaves.create_batch(vec![leave]).await?;
        let leave = created
            .pop()
            .ok_or_else(|| ApiError::InternalError("leave was not created".to_string()))?;
        info!(leave_id = %leave.id, worker_id = %leave.worker_id, total_days = leave.total_days, "leave applied");
        Ok(leave)
    }

    pub async fn change_dates(&self, leave_id: Uuid, from_date: NaiveDate, to_date: NaiveDate) -> ApiResult<LeaveApplicationModel> {
        if from_date > to_date {
            return Err(ApiError::InvalidInput(format!("from date {from_date} is after to date {to_date}")));
        }
        let mut leave = self.load(leave_id).await?;
        require_status(&leave, &[LeaveStatus::Pending], "change dates of")?;
        leave.from_date = from_date;
        leave.to_date = to_date;
        leave.recompute_total_days();
        self.save(leave).await
    }

    pub async fn approve(&self, leave_id: Uuid, decided_by: Uuid, notes: Option<String>) -> ApiResult<LeaveApplicationModel> {
        self.decide(leave_id, LeaveStatus::Approved, decided_by, notes).await
    }

    pub async fn reject(&self, leave_id: Uuid, decided_by: Uuid, notes: Option<String>) -> ApiResult<LeaveApplicationModel> {
        self.decide(leave_id, LeaveStatus::Rejected, decided_by, notes).await
    }

    pub async fn cancel(&self, leave_id: Uuid, cancelled_by: Uuid, notes: Option<String>) -> ApiResult<LeaveApplicationModel> {
        let mut leave = self.load(leave_id).await?;
        require_status(&leave, &[LeaveStatus::Pending, LeaveStatus::Approved], "cancel")?;
        leave.status = LeaveStatus::Cancelled;
        leave.decided_by = Some(cancelled_by);
        leave.decided_at = Some(self.clock.now());
        leave.decision_notes = notes;
        self.save(leave).await
    }

    /// `actual_return_date` is the first day back; the last day on leave
    /// becomes the day before it.
    pub async fn record_early_return(&self, leave_id: Uuid, actual_return_date: NaiveDate) -> ApiResult<LeaveApplicationModel> {
        let mut leave = self.load(leave_id).await?;
        require_status(&leave, &[LeaveStatus::Approved], "record an early return on")?;
        if actual_return_date <= leave.from_date || actual_return_date > leave.to_date {
            return Err(ApiError::InvalidInput(format!(
                "return date {} must fall after {} and no later than {}",
                actual_return_date, leave.from_date, leave.to_date
            )));
        }
        leave.early_return = true;
        leave.actual_return_date = Some(actual_return_date);
        leave.recompute_total_days();
        self.save(leave).await
    }

    async fn decide(
        &self,
        leave_id: Uuid,
        status: LeaveStatus,
        decided_by: Uuid,
        notes: Option<String>,
    ) -> ApiResult<LeaveApplicationModel> {
        let mut leave = self.load(leave_id).await?;
        require_status(&leave, &[LeaveStatus::Pending], "decide on")?;
        leave.status = status;
        leave.decided_by = Some(decided_by);
        leave.decided_at = Some(self.clock.now());
        leave.decision_notes = notes;
        self.save(leave).await
    }

    async fn load(&self, leave_id: Uuid) -> ApiResult<LeaveApplicationModel> {
        self.stores
            .leaves
            .load(leave_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("leave {leave_id}")))
    }

    async fn save(&self, leave: LeaveApplicationModel) -> ApiResult<LeaveApplicationModel> {
        let mut updated = self.stores.leaves.update_batch(vec![leave]).await?;
        let leave = updated
            .pop()
            .ok_or_else(|| ApiError::InternalError("leave was not updated".to_string()))?;
        info!(leave_id = %leave.id, status = %leave.status, total_days = leave.total_days, "leave updated");
        Ok(leave)
    }
}

fn require_status(leave: &LeaveApplicationModel, allowed: &[LeaveStatus], action: &str) -> ApiResult<()> {
    if allowed.contains(&leave.status) {
        Ok(())
    } else {
        Err(ApiError::Conflict(format!("cannot {} a {} leave", action, leave.status)))
    }
}
