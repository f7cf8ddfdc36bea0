use attendance_core_db::repository::{
    AttendanceRepository, LeaveRepository, SalaryRepository, SitePolicyRepository, WorkerRepository,
};
use sqlx::Database;
use std::sync::Arc;

/// Repositories one engine instance works against.
///
/// All handles should share the same session when the store is
/// transactional.
pub struct Stores<DB: Database> {
    pub workers: Arc<dyn WorkerRepository<DB>>,
    pub attendance: Arc<dyn AttendanceRepository<DB>>,
    pub leaves: Arc<dyn LeaveRepository<DB>>,
    pub salaries: Arc<dyn SalaryRepository<DB>>,
    pub sites: Arc<dyn SitePolicyRepository<DB>>,
}

impl<DB: Database> Stores<DB> {
    /// Bundle one value implementing every repository
    pub fn from_shared<R>(repository: Arc<R>) -> Self
    where
        R: WorkerRepository<DB>
            + AttendanceRepository<DB>
            + LeaveRepository<DB>
            + SalaryRepository<DB>
            + SitePolicyRepository<DB>
            + 'static,
    {
        Self {
            workers: repository.clone(),
            attendance: repository.clone(),
            leaves: repository.clone(),
            salaries: repository.clone(),
            sites: repository,
        }
    }
}

impl<DB: Database> Clone for Stores<DB> {
    fn clone(&self) -> Self {
        Self {
            workers: self.workers.clone(),
            attendance: self.attendance.clone(),
            leaves: self.leaves.clone(),
            salaries: self.salaries.clone(),
            sites: self.sites.clone(),
        }
    }
}
