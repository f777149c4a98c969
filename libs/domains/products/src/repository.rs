use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{Product, ProductFilter, UpdateProduct};

/// Repository trait for Product persistence
///
/// No extra finders beyond the generic contract: the product repository
/// exists to bind the collection and type pair. `update` takes the
/// patch form; `apply_discount` is the pipeline form, recomputing the
/// sale price inside the database from the stored main price.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product and return the stored record
    async fn create(&self, product: Product) -> ProductResult<Product>;

    /// Identity lookup
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// List products with optional filters and pagination
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Count products matching a filter
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// Partial update (patch form); returns the post-update record
    async fn update(&self, id: ObjectId, update: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Replace the image reference list
    async fn set_images(
        &self,
        id: ObjectId,
        images: Vec<String>,
    ) -> ProductResult<Option<Product>>;

    /// Set the discount and recompute the sale price atomically
    /// (pipeline form)
    async fn apply_discount(
        &self,
        id: ObjectId,
        discount_percent: f64,
    ) -> ProductResult<Option<Product>>;

    /// Soft delete; returns false when the product is missing or already
    /// frozen
    async fn freeze(&self, id: ObjectId) -> ProductResult<bool>;

    /// Undo a freeze; returns false when the product is missing or not
    /// frozen
    async fn restore(&self, id: ObjectId) -> ProductResult<bool>;

    /// Hard delete (secondary removal path)
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;
}
