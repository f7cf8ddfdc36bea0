pub mod repo_impl;
pub mod create_batch;
pub mod find_by_site;
pub mod load;
pub mod update_direction_state;

pub use repo_impl::WorkerRepositoryImpl;
