use attendance_core_db::models::site::SitePolicyModel;
use crate::executor::ExecutorError;
use sqlx::types::Json;
use std::error::Error;

use super::repo_impl::SitePolicyRepositoryImpl;

impl SitePolicyRepositoryImpl {
    /// Insert or fully replace a site policy. Administrative tooling owns
    /// these writes; the engine only stores run summaries.
    pub async fn save_policy(
        &self,
        policy: &SitePolicyModel,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;

        sqlx::query(
            r#"
            INSERT INTO site_policy (
                site_id, site_name, working_hours_per_day, half_day_threshold_hours,
                check_in_time, check_out_time, late_threshold_minutes,
                early_leave_threshold_minutes, weekend_days, holidays, overtime,
                auto_close_enabled, last_auto_close
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (site_id) DO UPDATE SET
                site_name = EXCLUDED.site_name,
                working_hours_per_day = EXCLUDED.working_hours_per_day,
                half_day_threshold_hours = EXCLUDED.half_day_threshold_hours,
                check_in_time = EXCLUDED.check_in_time,
                check_out_time = EXCLUDED.check_out_time,
                late_threshold_minutes = EXCLUDED.late_threshold_minutes,
                early_leave_threshold_minutes = EXCLUDED.early_leave_threshold_minutes,
                weekend_days = EXCLUDED.weekend_days,
                holidays = EXCLUDED.holidays,
                overtime = EXCLUDED.overtime,
                auto_close_enabled = EXCLUDED.auto_close_enabled,
                last_auto_close = EXCLUDED.last_auto_close
            "#,
        )
        .bind(policy.site_id)
        .bind(policy.site_name.as_str())
        .bind(policy.working_hours_per_day)
        .bind(policy.half_day_threshold_hours)
        .bind(policy.check_in_time)
        .bind(policy.check_out_time)
        .bind(policy.late_threshold_minutes)
        .bind(policy.early_leave_threshold_minutes)
        .bind(Json(&policy.weekend_days))
        .bind(Json(&policy.holidays))
        .bind(Json(&policy.overtime))
        .bind(policy.auto_close_enabled)
        .bind(policy.last_auto_close.as_ref().map(Json))
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }
}
