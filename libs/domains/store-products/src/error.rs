use api_error::ApiError;
use database::mongo::is_duplicate_key;
use domain_products::ProductError;
use domain_stores::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreProductError {
    #[error("Store not found")]
    StoreNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Store-Product relationship not found")]
    RelationshipNotFound,

    /// The (store, product) pair already exists; raised when the unique
    /// compound index rejects an insert
    #[error("Product is already listed in this store")]
    AlreadyListed,

    #[error("Failed to add product to store")]
    CreateFailed,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreProductResult<T> = Result<T, StoreProductError>;

impl From<mongodb::error::Error> for StoreProductError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            StoreProductError::AlreadyListed
        } else {
            StoreProductError::Database(err.to_string())
        }
    }
}

/// Anchor-entity lookups go through the sibling domains; their failures
/// keep their meaning where one exists here.
impl From<StoreError> for StoreProductError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => StoreProductError::StoreNotFound,
            other => StoreProductError::Database(other.to_string()),
        }
    }
}

impl From<ProductError> for StoreProductError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound => StoreProductError::ProductNotFound,
            other => StoreProductError::Database(other.to_string()),
        }
    }
}

/// Convert to the shared taxonomy the transport layer consumes.
impl From<StoreProductError> for ApiError {
    fn from(err: StoreProductError) -> Self {
        let message = err.to_string();
        match err {
            StoreProductError::StoreNotFound
            | StoreProductError::ProductNotFound
            | StoreProductError::RelationshipNotFound => ApiError::NotFound(message),
            StoreProductError::AlreadyListed
            | StoreProductError::CreateFailed
            | StoreProductError::Validation(_) => ApiError::BadRequest(message),
            StoreProductError::Database(_) => ApiError::InternalServerError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_pair_maps_to_bad_request() {
        let api: ApiError = StoreProductError::AlreadyListed.into();
        assert!(matches!(api, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_relationship_miss_maps_to_not_found() {
        let api: ApiError = StoreProductError::RelationshipNotFound.into();
        assert!(
            matches!(api, ApiError::NotFound(msg) if msg == "Store-Product relationship not found")
        );
    }

    #[test]
    fn test_store_error_keeps_not_found_meaning() {
        let err: StoreProductError = StoreError::NotFound.into();
        assert!(matches!(err, StoreProductError::StoreNotFound));
    }
}
