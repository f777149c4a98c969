use api_error::ApiError;
use database::mongo::is_duplicate_key;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error("Product not found or already frozen")]
    AlreadyFrozen,

    #[error("Product not found or not frozen")]
    NotFrozen,

    #[error("Failed to create this product instance")]
    CreateFailed,

    #[error("Failed to update this product instance")]
    UpdateFailed,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            ProductError::Duplicate(err.to_string())
        } else {
            ProductError::Database(err.to_string())
        }
    }
}

/// Convert to the shared taxonomy the transport layer consumes.
impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::NotFound | ProductError::AlreadyFrozen | ProductError::NotFrozen => {
                ApiError::NotFound(message)
            }
            ProductError::CreateFailed
            | ProductError::UpdateFailed
            | ProductError::Validation(_)
            | ProductError::Duplicate(_) => ApiError::BadRequest(message),
            ProductError::Database(_) => ApiError::InternalServerError(message),
        }
    }
}
