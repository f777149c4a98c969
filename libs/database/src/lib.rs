//! Database library providing MongoDB connectivity and the generic repository
//! used by every domain crate.
//!
//! # Examples
//!
//! ## Connecting
//!
//! ```ignore
//! use database::mongo;
//!
//! let client = mongo::connect("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//! ```
//!
//! ## Generic repository
//!
//! ```ignore
//! use database::mongo::{ReadOptions, Repository, UpdateSpec};
//! use mongodb::bson::doc;
//!
//! let repo: Repository<Customer> = Repository::new(db.collection("customers"));
//! let created = repo.create(vec![customer]).await?;
//! let found = repo.find_one(doc! { "email": "a@x.com" }, ReadOptions::new()).await?;
//! let updated = repo
//!     .find_one_and_update(doc! { "email": "a@x.com" }, UpdateSpec::fields(doc! { "phone": "123" }))
//!     .await?;
//! ```

pub mod common;
pub mod mongo;

pub use common::{retry, retry_with_backoff, RetryConfig};
