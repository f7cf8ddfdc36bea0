use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for loading a record by its primary key
///
/// Missing records are `Ok(None)`, so callers can tell "unknown id" apart
/// from a storage failure.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The record type that must implement Identifiable trait
///
/// # Example
/// ```ignore
/// impl Load<Postgres, WorkerModel> for WorkerRepositoryImpl {
///     async fn load(&self, id: Uuid) -> Result<Option<WorkerModel>, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait Load<DB: Database, T: Identifiable>: Send + Sync {
    /// Load a record by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(T))` - The loaded record
    /// * `Ok(None)` - If no record has this id
    /// * `Err` - An error if the query could not be executed
    async fn load(&self, id: Uuid) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>>;
}
