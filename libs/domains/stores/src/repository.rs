use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::StoreResult;
use crate::models::{Store, StoreFilter, UpdateStore};

/// Repository trait for Store persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Persist a new store and return the stored record
    async fn create(&self, store: Store) -> StoreResult<Store>;

    /// Identity lookup, also the existence probe for cross-domain
    /// pre-checks
    async fn get_by_id(&self, id: ObjectId) -> StoreResult<Option<Store>>;

    /// List stores with optional filters and pagination
    async fn list(&self, filter: StoreFilter) -> StoreResult<Vec<Store>>;

    /// Count stores matching a filter
    async fn count(&self, filter: StoreFilter) -> StoreResult<u64>;

    /// Partial update; returns the post-update record
    async fn update(&self, id: ObjectId, update: UpdateStore) -> StoreResult<Option<Store>>;

    /// Remove and return the store
    async fn delete(&self, id: ObjectId) -> StoreResult<Option<Store>>;
}
