//! Customer Service - Business logic layer

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{CreateCustomer, Customer, UpdateCustomer};
use crate::repository::CustomerRepository;

/// Customer service providing registration, login and profile operations.
///
/// Uniqueness of email and phone is pre-checked here before insert; the
/// unique indexes remain the final guard against concurrent registrations.
pub struct CustomerService<R: CustomerRepository> {
    repository: Arc<R>,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new customer account
    #[instrument(skip(self, input), fields(customer_email = %input.email))]
    pub async fn register(&self, input: CreateCustomer) -> CustomerResult<Customer> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(CustomerError::EmailTaken);
        }

        if self.repository.find_by_phone(&input.phone).await?.is_some() {
            return Err(CustomerError::PhoneTaken);
        }

        let password_hash = self.hash_password(&input.password)?;
        let customer = Customer::new(input, password_hash);

        let created = self.repository.create(customer).await?;
        Ok(created.redacted())
    }

    /// Verify credentials and return the account on success.
    ///
    /// A missing account and a wrong password produce the same error, so
    /// callers cannot probe which emails are registered.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> CustomerResult<Customer> {
        let customer = self
            .repository
            .find_by_email_with_password(email)
            .await?
            .ok_or(CustomerError::InvalidCredentials)?;

        let digest = customer
            .password
            .as_deref()
            .ok_or_else(|| CustomerError::Database("password missing on login read".to_string()))?;

        if !self.verify_password(password, digest)? {
            return Err(CustomerError::InvalidCredentials);
        }

        Ok(customer.redacted())
    }

    /// Fetch a customer profile by id
    #[instrument(skip(self))]
    pub async fn get_profile(&self, customer_id: ObjectId) -> CustomerResult<Customer> {
        self.repository
            .find_by_id(customer_id)
            .await?
            .ok_or(CustomerError::NotFound)
    }

    /// Update profile fields; phone uniqueness is re-checked when the
    /// phone actually changes
    #[instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        customer_id: ObjectId,
        input: UpdateCustomer,
    ) -> CustomerResult<Customer> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        let existing = self
            .repository
            .find_by_id(customer_id)
            .await?
            .ok_or(CustomerError::NotFound)?;

        if let Some(ref new_phone) = input.phone {
            if new_phone.trim() != existing.phone
                && self.repository.find_by_phone(new_phone).await?.is_some()
            {
                return Err(CustomerError::PhoneTaken);
            }
        }

        self.repository
            .update_profile(customer_id, input)
            .await?
            .ok_or(CustomerError::UpdateFailed)
    }

    /// Change the account password after verifying the current one
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        customer_id: ObjectId,
        current_password: &str,
        new_password: &str,
    ) -> CustomerResult<()> {
        validate_password(new_password)?;

        let customer = self
            .repository
            .find_by_id_with_password(customer_id)
            .await?
            .ok_or(CustomerError::NotFound)?;

        let digest = customer.password.as_deref().ok_or_else(|| {
            CustomerError::Database("password missing on re-authentication read".to_string())
        })?;

        if !self.verify_password(current_password, digest)? {
            return Err(CustomerError::WrongPassword);
        }

        let password_hash = self.hash_password(new_password)?;

        if !self
            .repository
            .set_password(customer_id, password_hash)
            .await?
        {
            return Err(CustomerError::UpdateFailed);
        }

        Ok(())
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> CustomerResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CustomerError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> CustomerResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| CustomerError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn validate_password(password: &str) -> CustomerResult<()> {
    if password.len() < 8 {
        return Err(CustomerError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if password.len() > 128 {
        return Err(CustomerError::Validation(
            "Password cannot exceed 128 characters".to_string(),
        ));
    }
    Ok(())
}

impl<R: CustomerRepository> Clone for CustomerService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
