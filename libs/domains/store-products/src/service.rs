//! Store-Product Service - the composite-key relationship workflow

use domain_products::ProductRepository;
use domain_stores::StoreRepository;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{StoreProductError, StoreProductResult};
use crate::models::{
    AddStoreProduct, StoreProduct, StoreProductWithProduct, StoreProductWithStore,
    UpdateStoreProduct,
};
use crate::repository::StoreProductRepository;

/// Service for the store-product relationship.
///
/// Creation verifies the store first, then the product, then inserts.
/// The three steps are independent round trips: a concurrent delete of
/// either anchor between check and insert is an accepted race, and a
/// concurrent duplicate insert is caught only by the unique compound
/// index on (store_id, product_id).
pub struct StoreProductService<R, S, P>
where
    R: StoreProductRepository,
    S: StoreRepository,
    P: ProductRepository,
{
    repository: Arc<R>,
    stores: Arc<S>,
    products: Arc<P>,
}

impl<R, S, P> StoreProductService<R, S, P>
where
    R: StoreProductRepository,
    S: StoreRepository,
    P: ProductRepository,
{
    pub fn new(repository: R, stores: S, products: P) -> Self {
        Self {
            repository: Arc::new(repository),
            stores: Arc::new(stores),
            products: Arc::new(products),
        }
    }

    /// Add a product to a store with store-specific price and stock
    #[instrument(skip(self, input))]
    pub async fn add_product_to_store(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
        input: AddStoreProduct,
    ) -> StoreProductResult<StoreProduct> {
        input
            .validate()
            .map_err(|e| StoreProductError::Validation(e.to_string()))?;

        // Store first, then product: a missing store reports as the
        // store even when both are missing
        self.stores
            .get_by_id(store_id)
            .await?
            .ok_or(StoreProductError::StoreNotFound)?;

        self.products
            .get_by_id(product_id)
            .await?
            .ok_or(StoreProductError::ProductNotFound)?;

        self.repository
            .create(StoreProduct::new(store_id, product_id, input))
            .await
    }

    /// All products offered by a store, product data embedded
    #[instrument(skip(self))]
    pub async fn get_store_products(
        &self,
        store_id: ObjectId,
    ) -> StoreProductResult<Vec<StoreProductWithProduct>> {
        self.stores
            .get_by_id(store_id)
            .await?
            .ok_or(StoreProductError::StoreNotFound)?;

        self.repository.list_for_store(store_id).await
    }

    /// All stores offering a product, store data embedded
    #[instrument(skip(self))]
    pub async fn get_product_stores(
        &self,
        product_id: ObjectId,
    ) -> StoreProductResult<Vec<StoreProductWithStore>> {
        self.products
            .get_by_id(product_id)
            .await?
            .ok_or(StoreProductError::ProductNotFound)?;

        self.repository.list_for_product(product_id).await
    }

    /// Update price, stock or availability of one relationship. The
    /// compound-filter update doubles as the existence check.
    #[instrument(skip(self, input))]
    pub async fn update_store_product(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
        input: UpdateStoreProduct,
    ) -> StoreProductResult<StoreProduct> {
        input
            .validate()
            .map_err(|e| StoreProductError::Validation(e.to_string()))?;

        self.repository
            .update_by_pair(store_id, product_id, input)
            .await?
            .ok_or(StoreProductError::RelationshipNotFound)
    }

    /// Remove a product from a store and return the removed row
    #[instrument(skip(self))]
    pub async fn remove_product_from_store(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
    ) -> StoreProductResult<StoreProduct> {
        self.repository
            .remove_by_pair(store_id, product_id)
            .await?
            .ok_or(StoreProductError::RelationshipNotFound)
    }
}

impl<R, S, P> Clone for StoreProductService<R, S, P>
where
    R: StoreProductRepository,
    S: StoreRepository,
    P: ProductRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            stores: Arc::clone(&self.stores),
            products: Arc::clone(&self.products),
        }
    }
}
