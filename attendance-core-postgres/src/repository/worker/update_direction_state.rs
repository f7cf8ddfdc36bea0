use async_trait::async_trait;
use attendance_core_api::{ApiError, Direction};
use attendance_core_db::repository::update_direction_state::UpdateDirectionState;
use chrono::NaiveDateTime;
use crate::executor::ExecutorError;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::WorkerRepositoryImpl;

impl WorkerRepositoryImpl {
    pub(super) async fn update_direction_state_impl(
        repo: &WorkerRepositoryImpl,
        worker_id: Uuid,
        direction: Direction,
        at: Option<NaiveDateTime>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let query = match (direction, at) {
            (Direction::In, Some(_)) => {
                r#"UPDATE worker SET current_direction = $2, last_check_in = $3 WHERE id = $1"#
            }
            (Direction::Out, Some(_)) => {
                r#"UPDATE worker SET current_direction = $2, last_check_out = $3 WHERE id = $1"#
            }
            (_, None) => r#"UPDATE worker SET current_direction = $2 WHERE id = $1"#,
        };

        let result = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(ExecutorError::Consumed)?;
            let mut statement = sqlx::query(query).bind(worker_id).bind(direction);
            if let Some(at) = at {
                statement = statement.bind(at);
            }
            statement.execute(&mut **transaction).await?
        };

        if result.rows_affected() == 0 {
            return Err(Box::new(ApiError::NotFound(format!("worker {worker_id}"))));
        }
        Ok(())
    }
}

#[async_trait]
impl UpdateDirectionState<Postgres> for WorkerRepositoryImpl {
    async fn update_direction_state(
        &self,
        worker_id: Uuid,
        direction: Direction,
        at: Option<NaiveDateTime>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Self::update_direction_state_impl(self, worker_id, direction, at).await
    }
}
