use attendance_core_api::{
    ApiError, ApiResult, AttendanceStatus, AutoCloseCounts, AutoCloseSummary, BatchItemFailure, DateRangeCloseSummary,
    Direction, EmploymentStatus, EntrySource, IssueKind,
};
use attendance_core_db::models::attendance::{AttendanceDayModel, AttendanceEntry, ValidationIssue};
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::models::site::SitePolicyModel;
use attendance_core_db::models::worker::WorkerModel;
use attendance_core_db::repository::{
    FindApprovedLeaves, FindBySite, FindDay, SaveDay, SaveRunSummary, UpdateDirectionState,
};
use chrono::NaiveDate;
use sqlx::Database;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::policy::{holiday_on, is_weekend, working_day_duration, SitePolicyProvider};
use crate::status::recompute_day;
use crate::stores::Stores;

/// Longest backfill accepted by `run_for_date_range`
const MAX_RANGE_DAYS: i64 = 366;

const INFERRED_CHECK_OUT_NOTE: &str = "Check-out inferred by daily close";
const OPEN_CHECK_IN_NOTE: &str = "Day closed with an open check-in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseOutcome {
    MarkedPresent,
    MarkedAbsent,
    MarkedOnLeave,
    MarkedHoliday,
    AlreadyMarked,
}

impl CloseOutcome {
    fn count(self, counts: &mut AutoCloseCounts) {
        match self {
            CloseOutcome::MarkedPresent => counts.marked_present += 1,
            CloseOutcome::MarkedAbsent => counts.marked_absent += 1,
            CloseOutcome::MarkedOnLeave => counts.marked_on_leave += 1,
            CloseOutcome::MarkedHoliday => counts.marked_holiday += 1,
            CloseOutcome::AlreadyMarked => counts.already_marked += 1,
        }
    }
}

/// End-of-day finalization of attendance for one site.
///
/// Every write is create-if-absent keyed on (worker, date), or a versioned
/// update, so a run can be repeated for the same site and date.
pub struct AutoCloseJob<DB: Database> {
    stores: Stores<DB>,
    policies: Arc<SitePolicyProvider<DB>>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<DB: Database> AutoCloseJob<DB> {
    pub fn new(
        stores: Stores<DB>,
        policies: Arc<SitePolicyProvider<DB>>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            stores,
            policies,
            clock,
            config,
        }
    }

    /// Close every active worker's day at `site_id` for `date`.
    ///
    /// Fails as a whole only when the worker list or the site's leave list
    /// cannot be loaded; per-worker failures land in `failures`. An
    /// unreadable policy falls back to the default one.
    #[tracing::instrument(skip(self))]
    pub async fn run_for_site(&self, site_id: Uuid, date: NaiveDate) -> ApiResult<AutoCloseSummary> {
        let policy = self.policies.load_or_default(site_id).await;

        if !policy.auto_close_enabled {
            info!("auto-close disabled, nothing to do");
            let summary = AutoCloseSummary::skipped(site_id, date, "Auto-close is disabled for this site", self.clock.now());
            return self.finish(summary).await;
        }
        if is_weekend(&policy, date) {
            info!("weekend, nothing to do");
            let summary = AutoCloseSummary::skipped(site_id, date, format!("{date} is a weekend day"), self.clock.now());
            return self.finish(summary).await;
        }

        let workers = self
            .stores
            .workers
            .find_by_site(site_id, Some(EmploymentStatus::Active))
            .await?;
        let leaves = self.stores.leaves.find_approved_for_site(site_id, date, date).await?;
        let holiday = holiday_on(&policy, date).map(|holiday| holiday.name.to_string());

        let mut counts = AutoCloseCounts::default();
        let mut failures = Vec::new();
        for worker in workers.iter().filter(|w| w.employed_between(date, date)) {
            counts.processed += 1;
            let work = self.close_worker(&policy, worker, date, holiday.as_deref(), &leaves);
            match tokio::time::timeout(self.config.worker_timeout(), work).await {
                Ok(Ok(outcome)) => outcome.count(&mut counts),
                Ok(Err(err)) => {
                    warn!(worker_id = %worker.id, error = %err, "worker close failed");
                    counts.errors += 1;
                    failures.push(BatchItemFailure {
                        item_id: worker.id,
                        date: Some(date),
                        error: err.to_string(),
                    });
                }
                Err(_) => {
                    warn!(worker_id = %worker.id, timeout_ms = self.config.worker_timeout_ms, "worker close timed out");
                    counts.errors += 1;
                    failures.push(BatchItemFailure {
                        item_id: worker.id,
                        date: Some(date),
                        error: ApiError::Timeout(format!(
                            "closing worker {} took longer than {} ms",
                            worker.id, self.config.worker_timeout_ms
                        ))
                        .to_string(),
                    });
                }
            }
        }

        let message = match (&holiday, failures.len()) {
            (Some(name), 0) => Some(format!("Holiday: {name}")),
            (Some(name), failed) => Some(format!("Holiday: {name}. {failed} worker(s) failed")),
            (None, 0) => None,
            (None, failed) => Some(format!("{failed} worker(s) failed")),
        };
        let summary = AutoCloseSummary {
            site_id,
            date,
            ok: failures.is_empty(),
            message,
            counts,
            failures,
            completed_at: self.clock.now(),
        };
        info!(
            processed = summary.counts.processed,
            marked_present = summary.counts.marked_present,
            marked_absent = summary.counts.marked_absent,
            marked_on_leave = summary.counts.marked_on_leave,
            marked_holiday = summary.counts.marked_holiday,
            already_marked = summary.counts.already_marked,
            errors = summary.counts.errors,
            "auto-close finished"
        );
        self.finish(summary).await
    }

    /// Sequential day-by-day backfill over [start, end]
    #[tracing::instrument(skip(self))]
    pub async fn run_for_date_range(
        &self,
        site_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<DateRangeCloseSummary> {
        if start > end {
            return Err(ApiError::InvalidInput(format!("start date {start} is after end date {end}")));
        }
        if (end - start).num_days() >= MAX_RANGE_DAYS {
            return Err(ApiError::InvalidInput(format!(
                "date range may span at most {MAX_RANGE_DAYS} days"
            )));
        }

        let mut totals = AutoCloseCounts::default();
        let mut days = Vec::new();
        for date in start.iter_days().take_while(|date| *date <= end) {
            let summary = self.run_for_site(site_id, date).await?;
            totals.add(&summary.counts);
            days.push(summary);
        }
        Ok(DateRangeCloseSummary {
            site_id,
            start_date: start,
            end_date: end,
            totals,
            days,
        })
    }

    async fn finish(&self, summary: AutoCloseSummary) -> ApiResult<AutoCloseSummary> {
        if !self.stores.sites.save_run_summary(summary.site_id, &summary).await? {
            debug!(site_id = %summary.site_id, "no stored policy, run summary not persisted");
        }
        self.policies.invalidate(summary.site_id).await;
        Ok(summary)
    }

    async fn close_worker(
        &self,
        policy: &SitePolicyModel,
        worker: &WorkerModel,
        date: NaiveDate,
        holiday: Option<&str>,
        leaves: &[LeaveApplicationModel],
    ) -> ApiResult<CloseOutcome> {
        let existing = self.stores.attendance.find_day(worker.id, date).await?;

        if let Some(name) = holiday {
            if existing.is_some() {
                return Ok(CloseOutcome::AlreadyMarked);
            }
            let mut day = AttendanceDayModel::new(worker.id, worker.site_id, date);
            day.status = AttendanceStatus::Holiday;
            day.auto_closed = true;
            day.notes = Some(format!("Holiday: {name}"));
            return self.create(day, CloseOutcome::MarkedHoliday).await;
        }

        match existing {
            Some(day) if day.is_leave_synced() => Ok(CloseOutcome::AlreadyMarked),
            Some(day) if day.has_entries() => self.rederive(policy, worker, day).await,
            Some(_) => Ok(CloseOutcome::AlreadyMarked),
            None => {
                let covering = leaves
                    .iter()
                    .find(|leave| leave.worker_id == worker.id && leave.covers(date));
                match (covering, worker.current_direction) {
                    (Some(leave), _) => self.create(on_leave_day(policy, worker, date, leave), CloseOutcome::MarkedOnLeave).await,
                    (None, Direction::In) => {
                        let outcome = self
                            .create(inferred_present_day(policy, worker, date), CloseOutcome::MarkedPresent)
                            .await?;
                        if outcome == CloseOutcome::MarkedPresent {
                            self.stores
                                .workers
                                .update_direction_state(worker.id, Direction::Out, None)
                                .await?;
                        }
                        Ok(outcome)
                    }
                    (None, Direction::Out) => {
                        let mut day = AttendanceDayModel::new(worker.id, worker.site_id, date);
                        day.auto_closed = true;
                        self.create(day, CloseOutcome::MarkedAbsent).await
                    }
                }
            }
        }
    }

    async fn create(&self, day: AttendanceDayModel, outcome: CloseOutcome) -> ApiResult<CloseOutcome> {
        if self.stores.attendance.create_day_if_absent(&day).await? {
            debug!(worker_id = %day.worker_id, status = %day.status, "day created");
            Ok(outcome)
        } else {
            Ok(CloseOutcome::AlreadyMarked)
        }
    }

    /// Re-derive a day that already has entries under the current
    /// thresholds. A day still open on IN is closed as is and the worker is
    /// set back to OUT.
    async fn rederive(
        &self,
        policy: &SitePolicyModel,
        worker: &WorkerModel,
        mut day: AttendanceDayModel,
    ) -> ApiResult<CloseOutcome> {
        let expected_version = day.version;
        let mut changed = recompute_day(&mut day, policy);

        let open = day.last_direction() == Some(Direction::In);
        if open && !day.validation_issues.iter().any(|issue| issue.message == OPEN_CHECK_IN_NOTE) {
            let at = day.last_entry().map(|entry| entry.timestamp).unwrap_or_else(|| self.clock.now());
            day.validation_issues
                .push(ValidationIssue::warning(IssueKind::InferredCheckOut, OPEN_CHECK_IN_NOTE, at));
            changed = true;
        }
        if open && !day.auto_closed {
            day.auto_closed = true;
            changed = true;
        }

        if changed {
            self.stores.attendance.update_day(&day, expected_version).await?;
            debug!(worker_id = %worker.id, status = %day.status, "day re-derived");
        }
        if open && worker.current_direction == Direction::In {
            self.stores
                .workers
                .update_direction_state(worker.id, Direction::Out, None)
                .await?;
        }
        Ok(CloseOutcome::AlreadyMarked)
    }
}

fn on_leave_day(
    policy: &SitePolicyModel,
    worker: &WorkerModel,
    date: NaiveDate,
    leave: &LeaveApplicationModel,
) -> AttendanceDayModel {
    let mut day = AttendanceDayModel::new(worker.id, worker.site_id, date);
    let start = date.and_time(policy.check_in_time);
    day.entries = vec![AttendanceEntry::new(Direction::In, start, EntrySource::LeaveSync)
        .with_note(&format!("On approved {} leave {}", leave.leave_type, leave.id))];
    day.leave_id = Some(leave.id);
    day.auto_closed = true;
    recompute_day(&mut day, policy);
    day
}

fn inferred_present_day(policy: &SitePolicyModel, worker: &WorkerModel, date: NaiveDate) -> AttendanceDayModel {
    let mut day = AttendanceDayModel::new(worker.id, worker.site_id, date);
    let check_in = date.and_time(policy.check_in_time);
    let check_out = check_in + working_day_duration(policy);
    day.entries = vec![
        AttendanceEntry::new(Direction::In, check_in, EntrySource::AutoClose),
        AttendanceEntry::new(Direction::Out, check_out, EntrySource::AutoClose).with_note(INFERRED_CHECK_OUT_NOTE),
    ];
    day.validation_issues.push(ValidationIssue::info(
        IssueKind::InferredCheckOut,
        INFERRED_CHECK_OUT_NOTE,
        check_out,
    ));
    day.notes = Some(INFERRED_CHECK_OUT_NOTE.to_string());
    day.auto_closed = true;
    recompute_day(&mut day, policy);
    day
}
