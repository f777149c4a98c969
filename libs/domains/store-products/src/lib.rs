//! Store-Products Domain
//!
//! The many-to-many relationship between stores and products: per-store
//! price, per-store stock and an availability flag. Identity of a
//! relationship row is the (store, product) pair, enforced by a unique
//! compound index.
//!
//! Both referenced entities are checked for existence before a
//! relationship is created. The check-then-insert sequence is three
//! independent round trips with no transaction around them; the compound
//! index is the final guard against a duplicate insert racing through.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::MongoProductRepository;
//! use domain_store_products::{MongoStoreProductRepository, StoreProductService};
//! use domain_stores::MongoStoreRepository;
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoStoreProductRepository::new(db.clone());
//! repository.ensure_indexes().await?;
//!
//! let service = StoreProductService::new(
//!     repository,
//!     MongoStoreRepository::new(db.clone()),
//!     MongoProductRepository::new(db),
//! );
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{StoreProductError, StoreProductResult};
pub use models::{
    AddStoreProduct, StoreProduct, StoreProductWithProduct, StoreProductWithStore,
    UpdateStoreProduct,
};
pub use mongodb::MongoStoreProductRepository;
pub use repository::StoreProductRepository;
pub use service::StoreProductService;
