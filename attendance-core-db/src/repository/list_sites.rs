use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

#[async_trait]
pub trait ListSites<DB: Database>: Send + Sync {
    /// Ids of every site with a stored policy
    async fn list_sites(&self) -> Result<Vec<Uuid>, Box<dyn std::error::Error + Send + Sync>>;
}
