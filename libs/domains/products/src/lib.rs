//! Products Domain
//!
//! Catalog products with derived slug and sale price, image references and
//! a freeze/restore soft-delete lifecycle, backed by MongoDB.
//!
//! The sale price is always recomputed server-side when `main_price` or
//! `discount_percent` changes; client input never sets it directly. The
//! primary removal path is freezing; hard deletion exists as a secondary
//! operation.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(db);
//! let service = ProductService::new(repository);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use models::{CreateProduct, Product, ProductFilter, UpdateProduct};
pub use mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
