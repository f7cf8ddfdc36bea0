use async_trait::async_trait;
use attendance_core_api::EmploymentStatus;
use sqlx::Database;
use uuid::Uuid;

use crate::models::worker::WorkerModel;

/// Lookup of the workers assigned to a site
#[async_trait]
pub trait FindBySite<DB: Database>: Send + Sync {
    /// Workers of `site_id`, optionally restricted to one employment status
    async fn find_by_site(
        &self,
        site_id: Uuid,
        status: Option<EmploymentStatus>,
    ) -> Result<Vec<WorkerModel>, Box<dyn std::error::Error + Send + Sync>>;
}
