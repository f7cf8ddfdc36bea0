pub mod attendance;
pub mod db_init;
pub mod leave;
pub mod salary;
pub mod site;
pub mod worker;

pub use attendance::AttendanceDayRepositoryImpl;
pub use leave::LeaveRepositoryImpl;
pub use salary::SalaryRecordRepositoryImpl;
pub use site::SitePolicyRepositoryImpl;
pub use worker::WorkerRepositoryImpl;
