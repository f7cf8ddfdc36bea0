use attendance_core_api::{ApiResult, SiteCloseOutcome};
use attendance_core_db::repository::{ListSites, SitePolicyRepository};
use chrono::NaiveDate;
use sqlx::Database;
use std::sync::Arc;
use tracing::{error, info};

use crate::auto_close::AutoCloseJob;

/// Entry point for an external timer, message consumer or manual backfill.
/// Holds no timing logic of its own.
pub struct DailyCloseScheduler<DB: Database> {
    sites: Arc<dyn SitePolicyRepository<DB>>,
    job: Arc<AutoCloseJob<DB>>,
}

impl<DB: Database> DailyCloseScheduler<DB> {
    pub fn new(sites: Arc<dyn SitePolicyRepository<DB>>, job: Arc<AutoCloseJob<DB>>) -> Self {
        Self { sites, job }
    }

    /// Close `date` for every known site, one site after the other.
    /// A failing site is reported in its outcome and the others still run.
    #[tracing::instrument(skip(self))]
    pub async fn trigger(&self, date: NaiveDate) -> ApiResult<Vec<SiteCloseOutcome>> {
        let site_ids = self.sites.list_sites().await?;
        let mut outcomes = Vec::with_capacity(site_ids.len());
        for site_id in site_ids {
            match self.job.run_for_site(site_id, date).await {
                Ok(summary) => outcomes.push(SiteCloseOutcome {
                    site_id,
                    summary: Some(summary),
                    error: None,
                }),
                Err(err) => {
                    error!(%site_id, error = %err, "daily close failed for site");
                    outcomes.push(SiteCloseOutcome {
                        site_id,
                        summary: None,
                        error: Some(err.to_string()),
                    });
                }
            }
        }
        info!(sites = outcomes.len(), "daily close triggered");
        Ok(outcomes)
    }
}
