use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A correctness check refused the request. Callers must not persist anything.
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Attempted mutation of a locked (paid) record, or a lost compare-and-swap.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Not working this month: {0}")]
    NotWorkingThisMonth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ApiError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Repository errors are boxed; an `ApiError` raised inside a repository
/// (for instance a failed compare-and-swap) survives the round trip.
impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_error) => *api_error,
            Err(other) => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_api_error_is_recovered() {
        let boxed: Box<dyn std::error::Error + Send + Sync> =
            Box::new(ApiError::Conflict("version mismatch".to_string()));
        let recovered: ApiError = boxed.into();
        assert_eq!(recovered, ApiError::Conflict("version mismatch".to_string()));
    }

    #[test]
    fn foreign_error_maps_to_database_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = "connection reset".into();
        let mapped: ApiError = boxed.into();
        assert_eq!(mapped, ApiError::DatabaseError("connection reset".to_string()));
    }
}
