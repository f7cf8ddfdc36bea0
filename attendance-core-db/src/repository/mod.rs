pub mod create_batch;
pub mod find_approved_leaves;
pub mod find_by_site;
pub mod find_day;
pub mod find_salary_record;
pub mod list_sites;
pub mod load;
pub mod save_day;
pub mod save_run_summary;
pub mod save_salary_record;
pub mod update_batch;
pub mod update_direction_state;

// Re-exports
pub use create_batch::*;
pub use find_approved_leaves::*;
pub use find_by_site::*;
pub use find_day::*;
pub use find_salary_record::*;
pub use list_sites::*;
pub use load::*;
pub use save_day::*;
pub use save_run_summary::*;
pub use save_salary_record::*;
pub use update_batch::*;
pub use update_direction_state::*;

use sqlx::Database;

use crate::models::{LeaveApplicationModel, SalaryRecordModel, SitePolicyModel, WorkerModel};

/// Everything the core needs from the worker store
pub trait WorkerRepository<DB: Database>:
    Load<DB, WorkerModel> + FindBySite<DB> + UpdateDirectionState<DB> + CreateBatch<DB, WorkerModel>
{
}

impl<DB: Database, T> WorkerRepository<DB> for T where
    T: Load<DB, WorkerModel> + FindBySite<DB> + UpdateDirectionState<DB> + CreateBatch<DB, WorkerModel>
{
}

pub trait AttendanceRepository<DB: Database>: FindDay<DB> + SaveDay<DB> {}

impl<DB: Database, T> AttendanceRepository<DB> for T where T: FindDay<DB> + SaveDay<DB> {}

pub trait LeaveRepository<DB: Database>:
    Load<DB, LeaveApplicationModel>
    + FindApprovedLeaves<DB>
    + CreateBatch<DB, LeaveApplicationModel>
    + UpdateBatch<DB, LeaveApplicationModel>
{
}

impl<DB: Database, T> LeaveRepository<DB> for T where
    T: Load<DB, LeaveApplicationModel>
        + FindApprovedLeaves<DB>
        + CreateBatch<DB, LeaveApplicationModel>
        + UpdateBatch<DB, LeaveApplicationModel>
{
}

pub trait SalaryRepository<DB: Database>:
    Load<DB, SalaryRecordModel> + FindSalaryRecord<DB> + SaveSalaryRecord<DB>
{
}

impl<DB: Database, T> SalaryRepository<DB> for T where
    T: Load<DB, SalaryRecordModel> + FindSalaryRecord<DB> + SaveSalaryRecord<DB>
{
}

pub trait SitePolicyRepository<DB: Database>:
    Load<DB, SitePolicyModel> + ListSites<DB> + SaveRunSummary<DB>
{
}

impl<DB: Database, T> SitePolicyRepository<DB> for T where
    T: Load<DB, SitePolicyModel> + ListSites<DB> + SaveRunSummary<DB>
{
}
