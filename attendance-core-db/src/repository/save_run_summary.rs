use async_trait::async_trait;
use attendance_core_api::AutoCloseSummary;
use sqlx::Database;
use uuid::Uuid;

/// The one site-policy field the core writes
#[async_trait]
pub trait SaveRunSummary<DB: Database>: Send + Sync {
    /// # Returns
    /// * `Ok(true)` - The summary was stored
    /// * `Ok(false)` - The site has no stored policy
    async fn save_run_summary(
        &self,
        site_id: Uuid,
        summary: &AutoCloseSummary,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
