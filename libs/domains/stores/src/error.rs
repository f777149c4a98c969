use api_error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store not found")]
    NotFound,

    #[error("Failed to create store")]
    CreateFailed,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Convert to the shared taxonomy the transport layer consumes.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NotFound => ApiError::NotFound(message),
            StoreError::CreateFailed | StoreError::Validation(_) => ApiError::BadRequest(message),
            StoreError::Database(_) => ApiError::InternalServerError(message),
        }
    }
}
