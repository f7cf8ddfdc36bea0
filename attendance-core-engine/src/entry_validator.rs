use attendance_core_api::{ApiError, ApiResult, Direction, EntryRequest, IssueKind};
use attendance_core_db::models::attendance::{AttendanceDayModel, AttendanceEntry, ValidationIssue};
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::models::site::SitePolicyModel;
use attendance_core_db::repository::{FindApprovedLeaves, FindDay, Load, SaveDay, UpdateDirectionState};
use chrono::{Datelike, NaiveDate};
use heapless::String as HeaplessString;
use serde::Serialize;
use sqlx::Database;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::EngineConfig;
use crate::locks::KeyedLocks;
use crate::policy::{early_leave_minutes, is_after_hours, is_weekend, late_minutes, SitePolicyProvider};
use crate::status::recompute_day;
use crate::stores::Stores;

/// Outcome of validating one candidate entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDecision {
    pub admitted: bool,
    /// Readable reasons for a rejection
    pub errors: Vec<String>,
    /// Advisory findings; never block admission
    pub warnings: Vec<ValidationIssue>,
    /// The approved leave that blocked the entry
    pub leave_conflict: Option<LeaveApplicationModel>,
    /// The persisted day, once the entry was recorded
    pub day: Option<AttendanceDayModel>,
}

impl EntryDecision {
    fn admit(warnings: Vec<ValidationIssue>) -> Self {
        Self {
            admitted: true,
            errors: Vec::new(),
            warnings,
            leave_conflict: None,
            day: None,
        }
    }

    fn reject(message: impl Into<String>) -> Self {
        Self {
            admitted: false,
            errors: vec![message.into()],
            warnings: Vec::new(),
            leave_conflict: None,
            day: None,
        }
    }
}

/// Gate for check-in/check-out entries.
///
/// Leave conflict, direction sequence and duplicate checks are hard
/// failures; anomaly, late, early leave, weekend and after-hours checks only
/// produce warnings.
pub struct EntryValidator<DB: Database> {
    stores: Stores<DB>,
    policies: Arc<SitePolicyProvider<DB>>,
    config: EngineConfig,
    locks: KeyedLocks<(Uuid, NaiveDate)>,
}

impl<DB: Database> EntryValidator<DB> {
    pub fn new(stores: Stores<DB>, policies: Arc<SitePolicyProvider<DB>>, config: EngineConfig) -> Self {
        Self {
            stores,
            policies,
            config,
            locks: KeyedLocks::new(),
        }
    }

    /// Decide on a candidate entry without recording it
    pub async fn validate(&self, request: &EntryRequest) -> ApiResult<EntryDecision> {
        request.validate()?;
        Ok(match self.read_day(request).await {
            Ok(day) => self.evaluate(request, day.as_ref()).await,
            Err(rejection) => rejection,
        })
    }

    /// Validate and, when admitted, append the entry to the worker's day.
    ///
    /// Runs under a per-(worker, date) lock. The day write is a
    /// compare-and-swap on `version`, so a concurrent writer elsewhere turns
    /// into a rejection rather than a lost entry.
    #[tracing::instrument(skip(self, request), fields(worker_id = %request.worker_id, date = %request.date, direction = %request.direction))]
    pub async fn validate_and_record_entry(&self, request: &EntryRequest) -> ApiResult<EntryDecision> {
        request.validate()?;
        self.stores
            .workers
            .load(request.worker_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("worker {}", request.worker_id)))?;

        let _guard = self.locks.lock((request.worker_id, request.date)).await;

        let existing = match self.read_day(request).await {
            Ok(day) => day,
            Err(rejection) => return Ok(rejection),
        };
        let mut decision = self.evaluate(request, existing.as_ref()).await;
        if !decision.admitted {
            debug!(errors = ?decision.errors, "entry rejected");
            return Ok(decision);
        }

        let policy = self.policies.load_or_default(request.site_id).await;
        let mut day = existing
            .clone()
            .unwrap_or_else(|| AttendanceDayModel::new(request.worker_id, request.site_id, request.date));
        day.entries.push(entry_from_request(request));
        recompute_day(&mut day, &policy);
        day.validation_issues.extend(decision.warnings.iter().cloned());

        let persisted = match existing {
            Some(previous) => match self.stores.attendance.update_day(&day, previous.version).await {
                Ok(updated) => updated,
                Err(err) => match ApiError::from(err) {
                    ApiError::Conflict(_) => return Ok(concurrent_change(request.date)),
                    other => return Err(other),
                },
            },
            None => {
                if !self.stores.attendance.create_day_if_absent(&day).await? {
                    return Ok(concurrent_change(request.date));
                }
                day
            }
        };

        // The entry is persisted at this point; report the failure as a warning
        if let Err(err) = self
            .stores
            .workers
            .update_direction_state(request.worker_id, request.direction, Some(request.timestamp))
            .await
        {
            error!(error = %err, "entry recorded but worker direction state could not be updated");
            decision.warnings.push(ValidationIssue::warning(
                IssueKind::Anomaly,
                format!("Entry recorded, but the worker's current direction could not be updated: {err}"),
                request.timestamp,
            ));
        }

        info!(status = %persisted.status, warnings = decision.warnings.len(), "entry recorded");
        decision.day = Some(persisted);
        Ok(decision)
    }

    async fn read_day(&self, request: &EntryRequest) -> Result<Option<AttendanceDayModel>, EntryDecision> {
        self.stores
            .attendance
            .find_day(request.worker_id, request.date)
            .await
            .map_err(|err| {
                warn!(worker_id = %request.worker_id, date = %request.date, error = %err, "attendance read failed");
                EntryDecision::reject(format!(
                    "Could not read attendance for {}: {}. Please retry",
                    request.date, err
                ))
            })
    }

    async fn evaluate(&self, request: &EntryRequest, day: Option<&AttendanceDayModel>) -> EntryDecision {
        if let Some(rejection) = self.check_leave(request).await {
            return rejection;
        }
        if let Some(message) = check_sequence(request, day) {
            return EntryDecision::reject(message);
        }
        if let Some(message) = check_duplicate(request, day, self.config.duplicate_window_secs) {
            return EntryDecision::reject(message);
        }

        let warnings = match self.policies.load(request.site_id).await {
            Ok(policy) => advisory_warnings(request, day, &policy, &self.config),
            Err(err) => {
                warn!(site_id = %request.site_id, error = %err, "advisory checks skipped");
                Vec::new()
            }
        };
        EntryDecision::admit(warnings)
    }

    async fn check_leave(&self, request: &EntryRequest) -> Option<EntryDecision> {
        let leaves = match self
            .stores
            .leaves
            .find_approved_for_worker(request.worker_id, request.date, request.date)
            .await
        {
            Ok(leaves) => leaves,
            Err(err) => {
                warn!(worker_id = %request.worker_id, error = %err, "leave lookup failed");
                return Some(EntryDecision::reject(format!(
                    "Could not check leave records: {err}. Please retry"
                )));
            }
        };

        let conflict = leaves.into_iter().find(|leave| leave.covers(request.date))?;
        let mut rejection = EntryDecision::reject(format!(
            "Worker is on approved {} leave from {} to {}",
            conflict.leave_type,
            conflict.from_date,
            conflict.effective_to_date()
        ));
        rejection.leave_conflict = Some(conflict);
        Some(rejection)
    }
}

fn check_sequence(request: &EntryRequest, day: Option<&AttendanceDayModel>) -> Option<String> {
    let last = day.and_then(|day| day.last_entry());
    match (last, request.direction) {
        (None, Direction::Out) => Some("Cannot mark OUT without marking IN first".to_string()),
        (None, Direction::In) => None,
        (Some(last), direction) if last.direction == direction => Some(format!(
            "Last entry was already {}. Next entry must be {}",
            direction,
            direction.opposite()
        )),
        (Some(last), _) if request.timestamp < last.timestamp => Some(format!(
            "Entry time {} is earlier than the last entry at {}",
            request.timestamp.format("%H:%M:%S"),
            last.timestamp.format("%H:%M:%S")
        )),
        _ => None,
    }
}

fn check_duplicate(request: &EntryRequest, day: Option<&AttendanceDayModel>, window_secs: i64) -> Option<String> {
    let day = day?;
    day.entries
        .iter()
        .filter(|entry| entry.direction == request.direction)
        .map(|entry| (request.timestamp - entry.timestamp).num_seconds().abs())
        .filter(|elapsed| *elapsed <= window_secs)
        .min()
        .map(|elapsed| {
            format!(
                "Duplicate {} entry: the previous {} was {} minute(s) ago",
                request.direction,
                request.direction,
                elapsed / 60
            )
        })
}

fn advisory_warnings(
    request: &EntryRequest,
    day: Option<&AttendanceDayModel>,
    policy: &SitePolicyModel,
    config: &EngineConfig,
) -> Vec<ValidationIssue> {
    let ts = request.timestamp;
    let mut warnings = Vec::new();

    let entry_count = day.map(|day| day.entries.len()).unwrap_or(0) + 1;
    if entry_count >= config.anomaly_entry_threshold {
        warnings.push(ValidationIssue::warning(
            IssueKind::Anomaly,
            format!("Unusual number of entries today ({entry_count})"),
            ts,
        ));
    }

    match request.direction {
        Direction::In => {
            if let Some(minutes) = late_minutes(policy, ts) {
                warnings.push(ValidationIssue::warning(
                    IssueKind::LateArrival,
                    format!("Late by {minutes} minutes"),
                    ts,
                ));
            }
        }
        Direction::Out => {
            if let Some(minutes) = early_leave_minutes(policy, ts) {
                warnings.push(ValidationIssue::warning(
                    IssueKind::EarlyLeave,
                    format!("Leaving {minutes} minutes early"),
                    ts,
                ));
            }
        }
    }

    if is_weekend(policy, request.date) {
        warnings.push(ValidationIssue::warning(
            IssueKind::Weekend,
            format!("Entry on a weekend day ({})", request.date.weekday()),
            ts,
        ));
    }
    if is_after_hours(config, ts) {
        warnings.push(ValidationIssue::warning(
            IssueKind::AfterHours,
            format!("Entry outside working hours ({})", ts.format("%H:%M")),
            ts,
        ));
    }
    warnings
}

fn entry_from_request(request: &EntryRequest) -> AttendanceEntry {
    let mut entry = AttendanceEntry::new(request.direction, request.timestamp, request.source);
    entry.device_id = request
        .device_id
        .as_deref()
        .and_then(|device| HeaplessString::try_from(device).ok());
    entry.marked_by = request.marked_by;
    match request.notes.as_deref() {
        Some(notes) => entry.with_note(notes),
        None => entry,
    }
}

fn concurrent_change(date: NaiveDate) -> EntryDecision {
    EntryDecision::reject(format!(
        "Attendance for {date} changed concurrently. Please retry the entry"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{at, date, leave, Harness};
    use attendance_core_api::{AttendanceStatus, EntrySource, LeaveStatus, LeaveType};
    use chrono::NaiveDateTime;
    use sqlx::Postgres;

    // Monday
    fn monday() -> NaiveDate {
        date(2025, 1, 6)
    }

    fn validator(harness: &Harness) -> EntryValidator<Postgres> {
        EntryValidator::new(harness.stores.clone(), harness.policies.clone(), harness.config.clone())
    }

    fn request(harness: &Harness, worker_id: Uuid, direction: Direction, ts: NaiveDateTime) -> EntryRequest {
        EntryRequest::manual(worker_id, harness.site_id, direction, ts)
    }

    #[tokio::test]
    async fn out_without_in_is_rejected() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = validator(&harness);

        let decision = validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::Out, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        assert!(!decision.admitted);
        assert_eq!(decision.errors, vec!["Cannot mark OUT without marking IN first".to_string()]);
        assert!(harness.store.day(worker.id, monday()).is_none());
    }

    #[tokio::test]
    async fn repeated_direction_is_rejected_with_readable_reason() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = validator(&harness);

        let first = validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        assert!(first.admitted);

        let second = validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::In, at(monday(), 11, 0, 0)))
            .await
            .unwrap();
        assert!(!second.admitted);
        assert_eq!(second.errors, vec!["Last entry was already IN. Next entry must be OUT".to_string()]);

        validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::Out, at(monday(), 17, 0, 0)))
            .await
            .unwrap();
        let third = validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::Out, at(monday(), 17, 30, 0)))
            .await
            .unwrap();
        assert_eq!(third.errors, vec!["Last entry was already OUT. Next entry must be IN".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_window_is_inclusive_of_five_minutes() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let validator = validator(&harness);

        let record = |worker_id, direction, ts| {
            let request = request(&harness, worker_id, direction, ts);
            let validator = &validator;
            async move { validator.validate_and_record_entry(&request).await.unwrap() }
        };

        let rejected_worker = harness.add_worker("Asha", date(2024, 1, 1));
        record(rejected_worker.id, Direction::In, at(monday(), 9, 0, 0)).await;
        record(rejected_worker.id, Direction::Out, at(monday(), 9, 2, 0)).await;
        let at_five = record(rejected_worker.id, Direction::In, at(monday(), 9, 5, 0)).await;
        assert!(!at_five.admitted);
        assert!(at_five.errors[0].contains("5 minute(s) ago"));

        let admitted_worker = harness.add_worker("Bilal", date(2024, 1, 1));
        record(admitted_worker.id, Direction::In, at(monday(), 9, 0, 0)).await;
        record(admitted_worker.id, Direction::Out, at(monday(), 9, 2, 0)).await;
        let after_five = record(admitted_worker.id, Direction::In, at(monday(), 9, 5, 1)).await;
        assert!(after_five.admitted);
    }

    #[tokio::test]
    async fn approved_leave_blocks_entries() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let sick = leave(&worker, LeaveType::Sick, date(2025, 1, 5), date(2025, 1, 8), LeaveStatus::Approved);
        harness.store.put_leave(sick.clone());
        let validator = validator(&harness);

        let decision = validator
            .validate(&request(&harness, worker.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        assert!(!decision.admitted);
        assert_eq!(decision.leave_conflict.map(|l| l.id), Some(sick.id));
        assert!(decision.errors[0].contains("sick"));
    }

    #[tokio::test]
    async fn pending_leave_does_not_block() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        harness
            .store
            .put_leave(leave(&worker, LeaveType::Casual, monday(), monday(), LeaveStatus::Pending));

        let decision = validator(&harness)
            .validate(&request(&harness, worker.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        assert!(decision.admitted);
    }

    #[tokio::test]
    async fn late_arrival_is_a_warning_and_recorded_on_the_day() {
        let harness = Harness::new(at(monday(), 9, 40, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = validator(&harness);

        let decision = validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::In, at(monday(), 9, 40, 0)))
            .await
            .unwrap();
        assert!(decision.admitted);
        assert_eq!(decision.warnings.len(), 1);
        assert_eq!(decision.warnings[0].kind, IssueKind::LateArrival);
        assert_eq!(decision.warnings[0].message, "Late by 40 minutes");

        let day = harness.store.day(worker.id, monday()).unwrap();
        assert_eq!(day.validation_issues.len(), 1);
        assert!(day.is_late);
        assert_eq!(day.entries.len(), 1);
        assert_eq!(day.version, 0);

        let worker = harness.store.worker(worker.id).unwrap();
        assert_eq!(worker.current_direction, Direction::In);
        assert_eq!(worker.last_check_in, Some(at(monday(), 9, 40, 0)));
    }

    #[tokio::test]
    async fn completed_day_is_recomputed_and_versioned() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = validator(&harness);

        for (direction, h, m) in [(Direction::In, 9, 0), (Direction::Out, 12, 0), (Direction::In, 13, 0), (Direction::Out, 17, 0)] {
            let decision = validator
                .validate_and_record_entry(&request(&harness, worker.id, direction, at(monday(), h, m, 0)))
                .await
                .unwrap();
            assert!(decision.admitted, "{:?}", decision.errors);
        }

        let day = harness.store.day(worker.id, monday()).unwrap();
        assert_eq!(day.version, 3);
        assert_eq!(day.total_hours, rust_decimal::Decimal::new(7, 0));
        assert_eq!(day.status, AttendanceStatus::Present);
        assert_eq!(day.check_out_time, Some(at(monday(), 17, 0, 0)));
    }

    #[tokio::test]
    async fn sixth_entry_is_flagged_as_anomaly() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = validator(&harness);

        let mut direction = Direction::In;
        let mut last = None;
        for hour in 9..15 {
            last = Some(
                validator
                    .validate_and_record_entry(&request(&harness, worker.id, direction, at(monday(), hour, 10, 0)))
                    .await
                    .unwrap(),
            );
            direction = direction.opposite();
        }
        let last = last.unwrap();
        assert!(last.admitted);
        assert!(last.warnings.iter().any(|w| w.kind == IssueKind::Anomaly));
    }

    #[tokio::test]
    async fn weekend_and_after_hours_are_warnings() {
        let sunday = date(2025, 1, 5);
        let harness = Harness::new(at(sunday, 4, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));

        let decision = validator(&harness)
            .validate(&request(&harness, worker.id, Direction::In, at(sunday, 4, 30, 0)))
            .await
            .unwrap();
        assert!(decision.admitted);
        let kinds: Vec<IssueKind> = decision.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&IssueKind::Weekend));
        assert!(kinds.contains(&IssueKind::AfterHours));
    }

    #[tokio::test]
    async fn store_failure_is_a_readable_rejection() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        harness.store.fail_day_reads_for(worker.id);

        let decision = validator(&harness)
            .validate_and_record_entry(&request(&harness, worker.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        assert!(!decision.admitted);
        assert!(decision.errors[0].starts_with("Could not read attendance"));
    }

    #[tokio::test]
    async fn malformed_request_is_invalid_input() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let mut bad = request(&harness, worker.id, Direction::In, at(monday(), 9, 0, 0));
        bad.date = date(2025, 1, 7);

        let result = validator(&harness).validate_and_record_entry(&bad).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn unknown_worker_is_not_found() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let result = validator(&harness)
            .validate_and_record_entry(&request(&harness, Uuid::new_v4(), Direction::In, at(monday(), 9, 0, 0)))
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_check_ins_admit_exactly_one() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = Arc::new(validator(&harness));

        let mut handles = Vec::new();
        for second in 0..8 {
            let validator = validator.clone();
            let request = request(&harness, worker.id, Direction::In, at(monday(), 9, 0, second));
            handles.push(tokio::spawn(async move {
                validator.validate_and_record_entry(&request).await.unwrap().admitted
            }));
        }
        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(harness.store.day(worker.id, monday()).unwrap().entries.len(), 1);
    }

    #[tokio::test]
    async fn admitted_entries_always_alternate() {
        let harness = Harness::new(at(monday(), 6, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = validator(&harness);

        // A noisy stream: repeats, bursts and gaps
        let pattern = [
            Direction::Out,
            Direction::In,
            Direction::In,
            Direction::Out,
            Direction::Out,
            Direction::In,
            Direction::Out,
            Direction::In,
            Direction::In,
            Direction::Out,
        ];
        let mut ts = at(monday(), 6, 0, 0);
        for (i, direction) in pattern.iter().enumerate() {
            ts += chrono::Duration::minutes(if i % 3 == 0 { 2 } else { 37 });
            validator
                .validate_and_record_entry(&EntryRequest {
                    source: EntrySource::Device,
                    ..request(&harness, worker.id, *direction, ts)
                })
                .await
                .unwrap();
        }

        let day = harness.store.day(worker.id, monday()).unwrap();
        let directions: Vec<Direction> = day.sorted_entries().iter().map(|e| e.direction).collect();
        assert_eq!(directions.first(), Some(&Direction::In));
        assert!(directions.windows(2).all(|pair| pair[0] != pair[1]));
    }

    #[tokio::test]
    async fn after_hours_starts_at_the_configured_end_hour() {
        let harness = Harness::new(at(monday(), 22, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        let validator = validator(&harness);

        let kinds_at = |h, m| {
            let request = request(&harness, worker.id, Direction::In, at(monday(), h, m, 0));
            let validator = &validator;
            async move {
                let decision = validator.validate(&request).await.unwrap();
                assert!(decision.admitted);
                decision.warnings.iter().map(|w| w.kind).collect::<Vec<IssueKind>>()
            }
        };

        assert!(!kinds_at(22, 59).await.contains(&IssueKind::AfterHours));
        assert!(kinds_at(23, 0).await.contains(&IssueKind::AfterHours));
        assert!(!kinds_at(5, 0).await.contains(&IssueKind::AfterHours));
        assert!(kinds_at(4, 59).await.contains(&IssueKind::AfterHours));
    }

    #[tokio::test]
    async fn early_check_out_is_a_warning_past_the_grace_period() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let validator = validator(&harness);

        let early = harness.add_worker("Asha", date(2024, 1, 1));
        validator
            .validate_and_record_entry(&request(&harness, early.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        let decision = validator
            .validate_and_record_entry(&request(&harness, early.id, Direction::Out, at(monday(), 16, 30, 0)))
            .await
            .unwrap();
        assert!(decision.admitted);
        assert_eq!(decision.warnings.len(), 1);
        assert_eq!(decision.warnings[0].kind, IssueKind::EarlyLeave);
        assert_eq!(decision.warnings[0].message, "Leaving 30 minutes early");
        let day = harness.store.day(early.id, monday()).unwrap();
        assert!(day.is_early_leave);
        assert_eq!(day.status, AttendanceStatus::EarlyLeave);

        let within_grace = harness.add_worker("Bilal", date(2024, 1, 1));
        validator
            .validate_and_record_entry(&request(&harness, within_grace.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        let decision = validator
            .validate_and_record_entry(&request(&harness, within_grace.id, Direction::Out, at(monday(), 16, 45, 0)))
            .await
            .unwrap();
        assert!(decision.admitted);
        assert!(decision.warnings.is_empty());
    }

    #[tokio::test]
    async fn direction_update_failure_keeps_the_recorded_entry() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        harness.store.fail_direction_updates_for(worker.id);
        let validator = validator(&harness);

        let decision = validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        assert!(decision.admitted);
        assert_eq!(decision.day.as_ref().map(|d| d.entries.len()), Some(1));
        assert_eq!(decision.warnings.len(), 1);
        assert_eq!(decision.warnings[0].kind, IssueKind::Anomaly);
        assert!(decision.warnings[0].message.starts_with("Entry recorded"));
        assert_eq!(harness.store.day(worker.id, monday()).unwrap().entries.len(), 1);
        assert_eq!(harness.store.worker(worker.id).unwrap().current_direction, Direction::Out);

        // The day, not the worker's direction state, drives the sequence check
        let out = validator
            .validate_and_record_entry(&request(&harness, worker.id, Direction::Out, at(monday(), 17, 0, 0)))
            .await
            .unwrap();
        assert!(out.admitted, "{:?}", out.errors);
    }

    #[tokio::test]
    async fn unreadable_policy_falls_back_to_default() {
        let harness = Harness::new(at(monday(), 9, 0, 0));
        let worker = harness.add_worker("Asha", date(2024, 1, 1));
        harness.store.fail_policy_reads();

        let decision = validator(&harness)
            .validate_and_record_entry(&request(&harness, worker.id, Direction::In, at(monday(), 9, 0, 0)))
            .await
            .unwrap();
        assert!(decision.admitted);
        assert_eq!(harness.store.day(worker.id, monday()).unwrap().status, AttendanceStatus::HalfDay);
    }
}
