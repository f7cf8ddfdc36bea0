use async_trait::async_trait;
use attendance_core_db::models::attendance::AttendanceDayModel;
use attendance_core_db::repository::find_day::FindDay;
use chrono::NaiveDate;
use crate::executor::ExecutorError;
use crate::utils::TryFromRow;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::AttendanceDayRepositoryImpl;

impl AttendanceDayRepositoryImpl {
    pub(super) async fn find_day_impl(
        repo: &AttendanceDayRepositoryImpl,
        worker_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceDayModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM attendance_day WHERE worker_id = $1 AND date = $2"#;
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(query)
                .bind(worker_id)
                .bind(date)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.map(|row| AttendanceDayModel::try_from_row(&row)).transpose()
    }

    pub(super) async fn find_days_in_range_impl(
        repo: &AttendanceDayRepositoryImpl,
        worker_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceDayModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"
            SELECT * FROM attendance_day
            WHERE worker_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
        "#;
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            sqlx::query(query)
                .bind(worker_id)
                .bind(start)
                .bind(end)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            days.push(AttendanceDayModel::try_from_row(&row)?);
        }
        Ok(days)
    }
}

#[async_trait]
impl FindDay<Postgres> for AttendanceDayRepositoryImpl {
    async fn find_day(
        &self,
        worker_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceDayModel>, Box<dyn Error + Send + Sync>> {
        Self::find_day_impl(self, worker_id, date).await
    }

    async fn find_days_in_range(
        &self,
        worker_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceDayModel>, Box<dyn Error + Send + Sync>> {
        Self::find_days_in_range_impl(self, worker_id, start, end).await
    }
}
