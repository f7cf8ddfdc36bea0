use async_trait::async_trait;
use attendance_core_api::Direction;
use chrono::NaiveDateTime;
use sqlx::Database;
use uuid::Uuid;

/// Narrow write of a worker's current direction
#[async_trait]
pub trait UpdateDirectionState<DB: Database>: Send + Sync {
    /// Set the current direction. `at` becomes `last_check_in` for IN and
    /// `last_check_out` for OUT; `None` leaves both timestamps untouched.
    async fn update_direction_state(
        &self,
        worker_id: Uuid,
        direction: Direction,
        at: Option<NaiveDateTime>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
