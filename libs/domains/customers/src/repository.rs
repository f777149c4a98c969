use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::CustomerResult;
use crate::models::{Customer, UpdateCustomer};

/// Repository trait for Customer persistence
///
/// Default reads never return the password digest; the `*_with_password`
/// finders override the projection for login and re-authentication flows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persist a new customer and return the stored record
    async fn create(&self, customer: Customer) -> CustomerResult<Customer>;

    /// Identity lookup, password excluded
    async fn find_by_id(&self, id: ObjectId) -> CustomerResult<Option<Customer>>;

    /// Lookup by email (normalized to lowercase + trimmed), password excluded
    async fn find_by_email(&self, email: &str) -> CustomerResult<Option<Customer>>;

    /// Lookup by email including the password digest
    async fn find_by_email_with_password(&self, email: &str) -> CustomerResult<Option<Customer>>;

    /// Lookup by phone (trimmed), password excluded
    async fn find_by_phone(&self, phone: &str) -> CustomerResult<Option<Customer>>;

    /// Identity lookup including the password digest
    async fn find_by_id_with_password(&self, id: ObjectId) -> CustomerResult<Option<Customer>>;

    /// Partial profile update; returns the post-update record or `None`
    /// when the customer does not exist
    async fn update_profile(
        &self,
        id: ObjectId,
        update: UpdateCustomer,
    ) -> CustomerResult<Option<Customer>>;

    /// Replace the password digest; returns false when the customer does
    /// not exist
    async fn set_password(&self, id: ObjectId, password_hash: String) -> CustomerResult<bool>;
}
