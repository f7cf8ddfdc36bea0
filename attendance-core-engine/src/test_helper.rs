//! In-memory repositories and fixtures for engine tests
//!
//! `MemoryStore` implements every repository trait for any `sqlx::Database`
//! marker, with the same compare-and-swap and create-if-absent rules as the
//! PostgreSQL adapter. Tests use `sqlx::Postgres` as the marker type.

use async_trait::async_trait;
use attendance_core_api::{
    ApiError, AttendanceStatus, AutoCloseSummary, Direction, EmploymentStatus, EntrySource, LeaveStatus, LeaveType,
};
use attendance_core_db::models::attendance::{AttendanceDayModel, AttendanceEntry};
use attendance_core_db::models::identifiable::Identifiable;
use attendance_core_db::models::leave::LeaveApplicationModel;
use attendance_core_db::models::salary::SalaryRecordModel;
use attendance_core_db::models::site::SitePolicyModel;
use attendance_core_db::models::worker::WorkerModel;
use attendance_core_db::repository::{
    CreateBatch, FindApprovedLeaves, FindBySite, FindDay, FindSalaryRecord, ListSites, Load, SaveDay,
    SaveRunSummary, SaveSalaryRecord, UpdateBatch, UpdateDirectionState,
};
use chrono::{NaiveDate, NaiveDateTime};
use heapless::String as HeaplessString;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use sqlx::{Database, Postgres};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::clock::FixedClock;
use crate::config::EngineConfig;
use crate::policy::{default_site_policy, SitePolicyProvider};
use crate::stores::Stores;

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Default)]
struct State {
    workers: HashMap<Uuid, WorkerModel>,
    days: HashMap<(Uuid, NaiveDate), AttendanceDayModel>,
    leaves: HashMap<Uuid, LeaveApplicationModel>,
    salaries: HashMap<Uuid, SalaryRecordModel>,
    policies: HashMap<Uuid, SitePolicyModel>,
    failing_day_reads: HashSet<Uuid>,
    slow_day_reads: HashSet<Uuid>,
    fail_worker_listing: bool,
    failing_direction_updates: HashSet<Uuid>,
    fail_policy_reads: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_worker(&self, worker: WorkerModel) {
        self.state.lock().workers.insert(worker.id, worker);
    }

    pub fn put_day(&self, day: AttendanceDayModel) {
        self.state.lock().days.insert((day.worker_id, day.date), day);
    }

    pub fn put_leave(&self, leave: LeaveApplicationModel) {
        self.state.lock().leaves.insert(leave.id, leave);
    }

    pub fn put_policy(&self, policy: SitePolicyModel) {
        self.state.lock().policies.insert(policy.site_id, policy);
    }

    pub fn put_salary(&self, record: SalaryRecordModel) {
        self.state.lock().salaries.insert(record.id, record);
    }

    pub fn worker(&self, id: Uuid) -> Option<WorkerModel> {
        self.state.lock().workers.get(&id).cloned()
    }

    pub fn day(&self, worker_id: Uuid, date: NaiveDate) -> Option<AttendanceDayModel> {
        self.state.lock().days.get(&(worker_id, date)).cloned()
    }

    pub fn day_count(&self) -> usize {
        self.state.lock().days.len()
    }

    pub fn leave(&self, id: Uuid) -> Option<LeaveApplicationModel> {
        self.state.lock().leaves.get(&id).cloned()
    }

    pub fn policy(&self, site_id: Uuid) -> Option<SitePolicyModel> {
        self.state.lock().policies.get(&site_id).cloned()
    }

    pub fn salary_for(&self, worker_id: Uuid, year: i32, month: i32) -> Option<SalaryRecordModel> {
        self.state
            .lock()
            .salaries
            .values()
            .find(|r| r.worker_id == worker_id && r.year == year && r.month == month)
            .cloned()
    }

    /// Day reads for this worker fail from now on
    pub fn fail_day_reads_for(&self, worker_id: Uuid) {
        self.state.lock().failing_day_reads.insert(worker_id);
    }

    /// Day reads for this worker stall for a second
    pub fn slow_day_reads_for(&self, worker_id: Uuid) {
        self.state.lock().slow_day_reads.insert(worker_id);
    }

    pub fn fail_worker_listing(&self) {
        self.state.lock().fail_worker_listing = true;
    }

    /// Direction-state writes for this worker fail from now on
    pub fn fail_direction_updates_for(&self, worker_id: Uuid) {
        self.state.lock().failing_direction_updates.insert(worker_id);
    }

    pub fn fail_policy_reads(&self) {
        self.state.lock().fail_policy_reads = true;
    }

    async fn before_day_read(&self, worker_id: Uuid) -> RepoResult<()> {
        let (failing, slow) = {
            let state = self.state.lock();
            (
                state.failing_day_reads.contains(&worker_id),
                state.slow_day_reads.contains(&worker_id),
            )
        };
        if failing {
            return Err("simulated read failure".into());
        }
        if slow {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        Ok(())
    }
}

#[async_trait]
impl<DB: Database> Load<DB, WorkerModel> for MemoryStore {
    async fn load(&self, id: Uuid) -> RepoResult<Option<WorkerModel>> {
        Ok(self.worker(id))
    }
}

#[async_trait]
impl<DB: Database> FindBySite<DB> for MemoryStore {
    async fn find_by_site(
        &self,
        site_id: Uuid,
        status: Option<EmploymentStatus>,
    ) -> RepoResult<Vec<WorkerModel>> {
        let state = self.state.lock();
        if state.fail_worker_listing {
            return Err("simulated worker listing failure".into());
        }
        let mut workers: Vec<WorkerModel> = state
            .workers
            .values()
            .filter(|w| w.site_id == site_id && status.map(|s| w.employment_status == s).unwrap_or(true))
            .cloned()
            .collect();
        workers.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(workers)
    }
}

#[async_trait]
impl<DB: Database> UpdateDirectionState<DB> for MemoryStore {
    async fn update_direction_state(
        &self,
        worker_id: Uuid,
        direction: Direction,
        at: Option<NaiveDateTime>,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.failing_direction_updates.contains(&worker_id) {
            return Err("simulated direction update failure".into());
        }
        let worker = state
            .workers
            .get_mut(&worker_id)
            .ok_or_else(|| ApiError::NotFound(format!("worker {worker_id}")))?;
        worker.current_direction = direction;
        match (direction, at) {
            (Direction::In, Some(at)) => worker.last_check_in = Some(at),
            (Direction::Out, Some(at)) => worker.last_check_out = Some(at),
            _ => {}
        }
        Ok(())
    }
}

#[async_trait]
impl<DB: Database> CreateBatch<DB, WorkerModel> for MemoryStore {
    async fn create_batch(&self, items: Vec<WorkerModel>) -> RepoResult<Vec<WorkerModel>> {
        let mut state = self.state.lock();
        for item in &items {
            state.workers.insert(item.get_id(), item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl<DB: Database> FindDay<DB> for MemoryStore {
    async fn find_day(&self, worker_id: Uuid, date: NaiveDate) -> RepoResult<Option<AttendanceDayModel>> {
        self.before_day_read(worker_id).await?;
        Ok(self.day(worker_id, date))
    }

    async fn find_days_in_range(
        &self,
        worker_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<AttendanceDayModel>> {
        self.before_day_read(worker_id).await?;
        let state = self.state.lock();
        let mut days: Vec<AttendanceDayModel> = state
            .days
            .values()
            .filter(|d| d.worker_id == worker_id && d.date >= start && d.date <= end)
            .cloned()
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }
}

#[async_trait]
impl<DB: Database> SaveDay<DB> for MemoryStore {
    async fn create_day_if_absent(&self, day: &AttendanceDayModel) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let key = (day.worker_id, day.date);
        if state.days.contains_key(&key) {
            return Ok(false);
        }
        state.days.insert(key, day.clone());
        Ok(true)
    }

    async fn update_day(&self, day: &AttendanceDayModel, expected_version: i64) -> RepoResult<AttendanceDayModel> {
        let mut state = self.state.lock();
        let stored = state
            .days
            .get_mut(&(day.worker_id, day.date))
            .ok_or_else(|| ApiError::NotFound(format!("attendance day {}", day.id)))?;
        if stored.version != expected_version {
            return Err(Box::new(ApiError::Conflict(format!(
                "attendance day {} changed concurrently",
                day.id
            ))));
        }
        let mut updated = day.clone();
        updated.version = expected_version + 1;
        *stored = updated.clone();
        Ok(updated)
    }
}

#[async_trait]
impl<DB: Database> Load<DB, LeaveApplicationModel> for MemoryStore {
    async fn load(&self, id: Uuid) -> RepoResult<Option<LeaveApplicationModel>> {
        Ok(self.leave(id))
    }
}

#[async_trait]
impl<DB: Database> FindApprovedLeaves<DB> for MemoryStore {
    async fn find_approved_for_worker(
        &self,
        worker_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<LeaveApplicationModel>> {
        let state = self.state.lock();
        Ok(state
            .leaves
            .values()
            .filter(|l| l.worker_id == worker_id && l.is_approved() && l.from_date <= end && l.to_date >= start)
            .cloned()
            .collect())
    }

    async fn find_approved_for_site(
        &self,
        site_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<LeaveApplicationModel>> {
        let state = self.state.lock();
        Ok(state
            .leaves
            .values()
            .filter(|l| l.site_id == site_id && l.is_approved() && l.from_date <= end && l.to_date >= start)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<DB: Database> CreateBatch<DB, LeaveApplicationModel> for MemoryStore {
    async fn create_batch(&self, items: Vec<LeaveApplicationModel>) -> RepoResult<Vec<LeaveApplicationModel>> {
        let mut state = self.state.lock();
        for item in &items {
            state.leaves.insert(item.id, item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl<DB: Database> UpdateBatch<DB, LeaveApplicationModel> for MemoryStore {
    async fn update_batch(&self, items: Vec<LeaveApplicationModel>) -> RepoResult<Vec<LeaveApplicationModel>> {
        let mut state = self.state.lock();
        for item in &items {
            if !state.leaves.contains_key(&item.id) {
                return Err(Box::new(ApiError::NotFound(format!("leave {}", item.id))));
            }
        }
        for item in &items {
            state.leaves.insert(item.id, item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl<DB: Database> Load<DB, SalaryRecordModel> for MemoryStore {
    async fn load(&self, id: Uuid) -> RepoResult<Option<SalaryRecordModel>> {
        Ok(self.state.lock().salaries.get(&id).cloned())
    }
}

#[async_trait]
impl<DB: Database> FindSalaryRecord<DB> for MemoryStore {
    async fn find_salary_record(&self, worker_id: Uuid, year: i32, month: i32) -> RepoResult<Option<SalaryRecordModel>> {
        Ok(self.salary_for(worker_id, year, month))
    }
}

#[async_trait]
impl<DB: Database> SaveSalaryRecord<DB> for MemoryStore {
    async fn insert_salary_record(&self, record: &SalaryRecordModel) -> RepoResult<SalaryRecordModel> {
        let mut state = self.state.lock();
        let duplicate = state
            .salaries
            .values()
            .any(|r| r.worker_id == record.worker_id && r.year == record.year && r.month == record.month);
        if duplicate {
            return Err(Box::new(ApiError::Conflict(format!(
                "salary record for worker {} {}-{:02} already exists",
                record.worker_id, record.year, record.month
            ))));
        }
        state.salaries.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn update_salary_record(&self, record: &SalaryRecordModel, expected_hash: i64) -> RepoResult<SalaryRecordModel> {
        let mut state = self.state.lock();
        let stored = state
            .salaries
            .get_mut(&record.id)
            .ok_or_else(|| ApiError::NotFound(format!("salary record {}", record.id)))?;
        if stored.hash != expected_hash {
            return Err(Box::new(ApiError::Conflict(format!(
                "salary record {} changed concurrently",
                record.id
            ))));
        }
        *stored = record.clone();
        Ok(record.clone())
    }
}

#[async_trait]
impl<DB: Database> Load<DB, SitePolicyModel> for MemoryStore {
    async fn load(&self, id: Uuid) -> RepoResult<Option<SitePolicyModel>> {
        if self.state.lock().fail_policy_reads {
            return Err("simulated policy read failure".into());
        }
        Ok(self.policy(id))
    }
}

#[async_trait]
impl<DB: Database> ListSites<DB> for MemoryStore {
    async fn list_sites(&self) -> RepoResult<Vec<Uuid>> {
        let mut sites: Vec<Uuid> = self.state.lock().policies.keys().copied().collect();
        sites.sort();
        Ok(sites)
    }
}

#[async_trait]
impl<DB: Database> SaveRunSummary<DB> for MemoryStore {
    async fn save_run_summary(&self, site_id: Uuid, summary: &AutoCloseSummary) -> RepoResult<bool> {
        let mut state = self.state.lock();
        match state.policies.get_mut(&site_id) {
            Some(policy) => {
                policy.last_auto_close = Some(summary.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(date: NaiveDate, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, second).unwrap()
}

pub fn site_with_policy(site_id: Uuid) -> SitePolicyModel {
    let mut policy = default_site_policy(site_id);
    policy.site_name = HeaplessString::try_from("North Hostel").unwrap();
    policy
}

pub fn worker(site_id: Uuid, name: &str, joining_date: NaiveDate) -> WorkerModel {
    WorkerModel {
        id: Uuid::new_v4(),
        site_id,
        display_name: HeaplessString::try_from(name).unwrap(),
        employment_status: EmploymentStatus::Active,
        current_direction: Direction::Out,
        last_check_in: None,
        last_check_out: None,
        base_salary: Decimal::new(31000, 0),
        joining_date,
        exit_date: None,
    }
}

pub fn leave(
    worker: &WorkerModel,
    leave_type: LeaveType,
    from_date: NaiveDate,
    to_date: NaiveDate,
    status: LeaveStatus,
) -> LeaveApplicationModel {
    LeaveApplicationModel {
        id: Uuid::new_v4(),
        worker_id: worker.id,
        site_id: worker.site_id,
        leave_type,
        from_date,
        to_date,
        reason: HeaplessString::try_from("medical").unwrap(),
        status,
        is_paid: false,
        total_days: LeaveApplicationModel::inclusive_days(from_date, to_date),
        early_return: false,
        actual_return_date: None,
        applied_at: at(from_date, 8, 0, 0),
        decided_by: None,
        decided_at: None,
        decision_notes: None,
    }
}

/// A closed day with one IN/OUT pair
pub fn worked_day(
    worker: &WorkerModel,
    date: NaiveDate,
    check_in: (u32, u32),
    check_out: (u32, u32),
    status: AttendanceStatus,
) -> AttendanceDayModel {
    let mut day = AttendanceDayModel::new(worker.id, worker.site_id, date);
    let check_in = at(date, check_in.0, check_in.1, 0);
    let check_out = at(date, check_out.0, check_out.1, 0);
    day.entries = vec![
        AttendanceEntry::new(Direction::In, check_in, EntrySource::Device),
        AttendanceEntry::new(Direction::Out, check_out, EntrySource::Device),
    ];
    day.check_in_time = Some(check_in);
    day.check_out_time = Some(check_out);
    day.total_hours = Decimal::from((check_out - check_in).num_minutes()) / Decimal::new(60, 0);
    day.status = status;
    day
}

/// Shared wiring for engine tests
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub stores: Stores<Postgres>,
    pub policies: Arc<SitePolicyProvider<Postgres>>,
    pub clock: Arc<FixedClock>,
    pub config: EngineConfig,
    pub site_id: Uuid,
}

impl Harness {
    /// One site with the default policy and the clock at `now`
    pub fn new(now: NaiveDateTime) -> Self {
        let store = Arc::new(MemoryStore::new());
        let site_id = Uuid::new_v4();
        store.put_policy(site_with_policy(site_id));

        let config = EngineConfig {
            worker_timeout_ms: 200,
            ..EngineConfig::default()
        };
        let stores = Stores::from_shared(store.clone());
        let policies = Arc::new(SitePolicyProvider::new(stores.sites.clone(), &config));
        Self {
            store,
            stores,
            policies,
            clock: Arc::new(FixedClock::new(now)),
            config,
            site_id,
        }
    }

    /// Replace the site's policy and drop it from the cache
    pub async fn update_policy(&self, update: impl FnOnce(&mut SitePolicyModel)) {
        let mut policy = self.store.policy(self.site_id).unwrap_or_else(|| site_with_policy(self.site_id));
        update(&mut policy);
        self.store.put_policy(policy);
        self.policies.invalidate(self.site_id).await;
    }

    pub fn add_worker(&self, name: &str, joining_date: NaiveDate) -> WorkerModel {
        let worker = worker(self.site_id, name, joining_date);
        self.store.put_worker(worker.clone());
        worker
    }
}
