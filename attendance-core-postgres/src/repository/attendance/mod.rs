pub mod repo_impl;
pub mod find_day;
pub mod save_day;

pub use repo_impl::AttendanceDayRepositoryImpl;
