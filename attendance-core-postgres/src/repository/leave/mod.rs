pub mod repo_impl;
pub mod create_batch;
pub mod find_approved_leaves;
pub mod load;
pub mod update_batch;

pub use repo_impl::LeaveRepositoryImpl;
