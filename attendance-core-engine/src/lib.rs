pub mod auto_close;
pub mod clock;
pub mod config;
pub mod entry_validator;
pub mod leave;
pub mod locks;
pub mod payroll;
pub mod policy;
pub mod reconciliation;
pub mod scheduler;
pub mod status;
pub mod stores;

pub use auto_close::AutoCloseJob;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use entry_validator::{EntryDecision, EntryValidator};
pub use leave::LeaveService;
pub use payroll::PayrollEngine;
pub use policy::SitePolicyProvider;
pub use reconciliation::ReconciliationService;
pub use scheduler::DailyCloseScheduler;
pub use stores::Stores;

#[cfg(test)]
pub mod test_helper;
