pub mod repo_impl;
pub mod find_salary_record;
pub mod load;
pub mod save_salary_record;

pub use repo_impl::SalaryRecordRepositoryImpl;
