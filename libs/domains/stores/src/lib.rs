//! Stores Domain
//!
//! Physical stores of the catalog: name, contact details, a GeoJSON
//! location and category tags, backed by MongoDB.
//!
//! Geospatial *queries* belong to an out-of-scope helper layer; this crate
//! only validates and persists the 2dsphere-shaped location data.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_stores::{MongoStoreRepository, StoreService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoStoreRepository::new(db);
//! let service = StoreService::new(repository);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use models::{CreateStore, GeoPoint, Store, StoreFilter, StorePage, UpdateStore};
pub use mongodb::MongoStoreRepository;
pub use repository::StoreRepository;
pub use service::StoreService;
