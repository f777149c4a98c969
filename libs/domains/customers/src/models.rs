use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Postal address sub-document (no identity of its own)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<String>,
}

/// Customer entity - represents a customer account stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    /// Lowercased and trimmed; unique across all customers
    pub email: String,
    /// Trimmed; unique across all customers
    pub phone: String,
    /// Argon2 digest. Projected out of every read unless a
    /// `*_with_password` finder is used, hence optional.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by every update-family write
    #[serde(default)]
    pub revision: i64,
}

/// DTO for registering a new customer
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomer {
    #[validate(length(min = 2, max = 50))]
    pub first_name: String,
    #[validate(length(min = 2, max = 50))]
    pub last_name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub address: Option<Address>,
}

/// DTO for updating a customer profile. Email is immutable; password
/// changes go through the dedicated change-password flow.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomer {
    #[validate(length(min = 2, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, max = 50))]
    pub last_name: Option<String>,
    #[validate(length(min = 5, max = 20))]
    pub phone: Option<String>,
    pub address: Option<Address>,
}

/// Lowercase and trim, the canonical form stored and matched on.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Customer {
    /// Create a new customer from the registration DTO and a password
    /// digest. Email and phone are normalized here so every stored value
    /// is already canonical.
    pub fn new(input: CreateCustomer, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: normalize_email(&input.email),
            phone: input.phone.trim().to_string(),
            password: Some(password_hash),
            profile_photo: None,
            address: input.address,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Derived full-name view
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Drop the password digest before handing the record to a caller.
    pub fn redacted(mut self) -> Self {
        self.password = None;
        self
    }
}
