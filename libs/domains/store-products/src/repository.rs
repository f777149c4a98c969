use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::StoreProductResult;
use crate::models::{
    StoreProduct, StoreProductWithProduct, StoreProductWithStore, UpdateStoreProduct,
};

/// Repository trait for the store-product relationship.
///
/// No business logic lives here: existence pre-checks and uniqueness
/// decisions belong to the service. The repository only executes the
/// compound `(store_id, product_id)` filters the service constructs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreProductRepository: Send + Sync {
    /// Persist a new relationship row; a duplicate pair surfaces as
    /// `AlreadyListed`
    async fn create(&self, listing: StoreProduct) -> StoreProductResult<StoreProduct>;

    /// Compound-filter lookup
    async fn find_by_pair(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
    ) -> StoreProductResult<Option<StoreProduct>>;

    /// All rows for a store, product reference populated
    async fn list_for_store(
        &self,
        store_id: ObjectId,
    ) -> StoreProductResult<Vec<StoreProductWithProduct>>;

    /// All rows for a product, store reference populated
    async fn list_for_product(
        &self,
        product_id: ObjectId,
    ) -> StoreProductResult<Vec<StoreProductWithStore>>;

    /// Compound-filter update; returns the post-update row or `None`
    /// when the pair has no relationship
    async fn update_by_pair(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
        update: UpdateStoreProduct,
    ) -> StoreProductResult<Option<StoreProduct>>;

    /// Compound-filter delete-and-return
    async fn remove_by_pair(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
    ) -> StoreProductResult<Option<StoreProduct>>;
}
