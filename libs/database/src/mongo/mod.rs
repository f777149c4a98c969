//! MongoDB connector and the generic repository.
//!
//! Connection management lives in [`connect`]/[`connect_from_config`];
//! [`Repository`] is the typed access contract every entity repository
//! builds on.

mod config;
mod connector;
mod health;
mod repository;

pub use config::MongoConfig;
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_retry, MongoError,
};
pub use health::{check_health, check_health_detailed, HealthStatus};
pub use repository::{
    is_duplicate_key, Lookup, ReadOptions, Repository, UpdateSpec, REVISION_FIELD,
};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
