pub mod repo_impl;
pub mod list_sites;
pub mod load;
pub mod save_policy;
pub mod save_run_summary;

pub use repo_impl::SitePolicyRepositoryImpl;
