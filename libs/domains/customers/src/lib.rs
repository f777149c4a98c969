//! Customers Domain
//!
//! Customer accounts for the multi-store catalog: registration, login,
//! profile management and password changes, backed by MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Business logic, validation, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs
//! └─────────────┘
//! ```
//!
//! The password digest is excluded from every read by default; the
//! `*_with_password` finders exist for the login and re-authentication
//! flows only.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_customers::{CustomerService, MongoCustomerRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoCustomerRepository::new(db);
//! repository.ensure_indexes().await?;
//! let service = CustomerService::new(repository);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CustomerError, CustomerResult};
pub use models::{Address, CreateCustomer, Customer, UpdateCustomer};
pub use mongodb::MongoCustomerRepository;
pub use repository::CustomerRepository;
pub use service::CustomerService;
