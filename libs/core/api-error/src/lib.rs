//! Shared error taxonomy consumed by the transport layer.
//!
//! Domain crates convert their errors into [`ApiError`]; the HTTP layer maps
//! each kind onto a status code. Keeping the taxonomy transport-agnostic lets
//! the domain crates stay free of any web framework dependency.

use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Error kinds raised by domain services around the repository layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Malformed input or a failed business invariant (duplicate email,
    /// duplicate store-product pair, invalid credentials, ...).
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// A referenced entity does not exist for the given identifier or filter.
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Authentication token missing, invalid, or referring to a customer
    /// that no longer exists. Raised by the auth middleware, not by the
    /// domain services themselves.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Storage-driver or other unexpected failure.
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// One field-level validation issue: field path plus message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Flatten `validator` output into a list of field path + message pairs.
pub fn field_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| FieldIssue {
                field: field.clone(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let summary = field_issues(&errors)
            .into_iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::BadRequest(summary)
    }
}
