pub mod executor;
pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use executor::{Executor, ExecutorError};
pub use postgres_repositories::{PostgresRepositories, PostgresSession};

#[cfg(test)]
pub mod test_helper;
