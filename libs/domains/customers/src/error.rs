use api_error::ApiError;
use database::mongo::is_duplicate_key;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Customer not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Phone number already registered")]
    PhoneTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Failed to create customer account")]
    CreateFailed,

    #[error("Failed to update customer profile")]
    UpdateFailed,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Storage-level uniqueness violation that slipped past the service
    /// pre-checks (two registrations racing on the same email or phone).
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CustomerResult<T> = Result<T, CustomerError>;

impl From<mongodb::error::Error> for CustomerError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            CustomerError::Duplicate(err.to_string())
        } else {
            CustomerError::Database(err.to_string())
        }
    }
}

/// Convert to the shared taxonomy the transport layer consumes.
impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        let message = err.to_string();
        match err {
            CustomerError::NotFound => ApiError::NotFound(message),
            CustomerError::EmailTaken
            | CustomerError::PhoneTaken
            | CustomerError::InvalidCredentials
            | CustomerError::WrongPassword
            | CustomerError::CreateFailed
            | CustomerError::UpdateFailed
            | CustomerError::Validation(_)
            | CustomerError::Duplicate(_) => ApiError::BadRequest(message),
            CustomerError::PasswordHash(_) | CustomerError::Database(_) => {
                ApiError::InternalServerError(message)
            }
        }
    }
}
