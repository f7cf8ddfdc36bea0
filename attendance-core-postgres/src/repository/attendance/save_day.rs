use async_trait::async_trait;
use attendance_core_api::ApiError;
use attendance_core_db::models::attendance::AttendanceDayModel;
use attendance_core_db::repository::save_day::SaveDay;
use crate::executor::ExecutorError;
use sqlx::types::Json;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::AttendanceDayRepositoryImpl;

impl AttendanceDayRepositoryImpl {
    pub(super) async fn create_day_if_absent_impl(
        repo: &AttendanceDayRepositoryImpl,
        day: &AttendanceDayModel,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;

        let result = sqlx::query(
            r#"
            INSERT INTO attendance_day (
                id, worker_id, site_id, date, entries, check_in_time, check_out_time,
                total_hours, status, is_late, is_early_leave, leave_id, validation_issues,
                reconciled, reconciled_by, reconciled_at, reconciliation_notes,
                auto_closed, notes, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            ON CONFLICT (worker_id, date) DO NOTHING
            "#,
        )
        .bind(day.id)
        .bind(day.worker_id)
        .bind(day.site_id)
        .bind(day.date)
        .bind(Json(&day.entries))
        .bind(day.check_in_time)
        .bind(day.check_out_time)
        .bind(day.total_hours)
        .bind(day.status)
        .bind(day.is_late)
        .bind(day.is_early_leave)
        .bind(day.leave_id)
        .bind(Json(&day.validation_issues))
        .bind(day.reconciled)
        .bind(day.reconciled_by)
        .bind(day.reconciled_at)
        .bind(day.reconciliation_notes.as_deref())
        .bind(day.auto_closed)
        .bind(day.notes.as_deref())
        .bind(day.version)
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub(super) async fn update_day_impl(
        repo: &AttendanceDayRepositoryImpl,
        day: &AttendanceDayModel,
        expected_version: i64,
    ) -> Result<AttendanceDayModel, Box<dyn Error + Send + Sync>> {
        let next_version = expected_version + 1;
        let result = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;

            sqlx::query(
                r#"
                UPDATE attendance_day SET
                    entries = $2, check_in_time = $3, check_out_time = $4, total_hours = $5,
                    status = $6, is_late = $7, is_early_leave = $8, leave_id = $9,
                    validation_issues = $10, reconciled = $11, reconciled_by = $12,
                    reconciled_at = $13, reconciliation_notes = $14, auto_closed = $15,
                    notes = $16, version = $17
                WHERE worker_id = $1 AND date = $18 AND version = $19
                "#,
            )
            .bind(day.worker_id)
            .bind(Json(&day.entries))
            .bind(day.check_in_time)
            .bind(day.check_out_time)
            .bind(day.total_hours)
            .bind(day.status)
            .bind(day.is_late)
            .bind(day.is_early_leave)
            .bind(day.leave_id)
            .bind(Json(&day.validation_issues))
            .bind(day.reconciled)
            .bind(day.reconciled_by)
            .bind(day.reconciled_at)
            .bind(day.reconciliation_notes.as_deref())
            .bind(day.auto_closed)
            .bind(day.notes.as_deref())
            .bind(next_version)
            .bind(day.date)
            .bind(expected_version)
            .execute(&mut **transaction)
            .await?
        };

        if result.rows_affected() == 0 {
            return Err(Box::new(ApiError::Conflict(format!(
                "attendance of worker {} on {} is no longer at version {}",
                day.worker_id, day.date, expected_version
            ))));
        }

        let mut saved = day.clone();
        saved.version = next_version;
        Ok(saved)
    }
}

#[async_trait]
impl SaveDay<Postgres> for AttendanceDayRepositoryImpl {
    async fn create_day_if_absent(
        &self,
        day: &AttendanceDayModel,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Self::create_day_if_absent_impl(self, day).await
    }

    async fn update_day(
        &self,
        day: &AttendanceDayModel,
        expected_version: i64,
    ) -> Result<AttendanceDayModel, Box<dyn Error + Send + Sync>> {
        Self::update_day_impl(self, day, expected_version).await
    }
}
