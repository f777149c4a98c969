//! MongoDB implementation of StoreProductRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongo::{Lookup, ReadOptions, Repository, UpdateSpec};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::instrument;

use crate::error::{StoreProductError, StoreProductResult};
use crate::models::{
    StoreProduct, StoreProductWithProduct, StoreProductWithStore, UpdateStoreProduct,
};
use crate::repository::StoreProductRepository;

const COLLECTION: &str = "store_products";

/// Collection names of the referenced entities, used by the `$lookup`
/// population stages
const STORES_COLLECTION: &str = "stores";
const PRODUCTS_COLLECTION: &str = "products";

/// MongoDB implementation of the StoreProductRepository
pub struct MongoStoreProductRepository {
    repo: Repository<StoreProduct>,
}

impl MongoStoreProductRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    /// Bind to a custom collection name (isolated test databases)
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            repo: Repository::new(db.collection::<StoreProduct>(collection_name)),
        }
    }

    /// Create the unique compound index on (store_id, product_id) plus
    /// the single-field query indexes. Idempotent.
    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "store_id": 1, "product_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "store_id": 1 }).build(),
            IndexModel::builder().keys(doc! { "product_id": 1 }).build(),
            IndexModel::builder().keys(doc! { "is_available": 1 }).build(),
        ];
        self.repo.collection().create_indexes(indexes).await?;
        Ok(())
    }

    fn pair_filter(store_id: ObjectId, product_id: ObjectId) -> Document {
        doc! { "store_id": store_id, "product_id": product_id }
    }

    fn build_update_patch(update: UpdateStoreProduct) -> Document {
        let mut fields = doc! {};
        if let Some(price) = update.price {
            fields.insert("price", price);
        }
        if let Some(stock) = update.stock {
            fields.insert("stock", stock);
        }
        if let Some(is_available) = update.is_available {
            fields.insert("is_available", is_available);
        }
        fields.insert("updated_at", Utc::now().to_rfc3339());
        fields
    }
}

#[async_trait]
impl StoreProductRepository for MongoStoreProductRepository {
    #[instrument(skip(self, listing), fields(store_id = %listing.store_id, product_id = %listing.product_id))]
    async fn create(&self, listing: StoreProduct) -> StoreProductResult<StoreProduct> {
        let mut created = self.repo.create(vec![listing]).await?;

        match created.pop() {
            Some(listing) => {
                tracing::info!(listing_id = %listing.id, "Product added to store");
                Ok(listing)
            }
            None => Err(StoreProductError::CreateFailed),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_pair(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
    ) -> StoreProductResult<Option<StoreProduct>> {
        let listing = self
            .repo
            .find_one(Self::pair_filter(store_id, product_id), ReadOptions::new())
            .await?;
        Ok(listing)
    }

    #[instrument(skip(self))]
    async fn list_for_store(
        &self,
        store_id: ObjectId,
    ) -> StoreProductResult<Vec<StoreProductWithProduct>> {
        let listings = self
            .repo
            .find_populated::<StoreProductWithProduct>(
                doc! { "store_id": store_id },
                Lookup::by_id(PRODUCTS_COLLECTION, "product_id", "product"),
                ReadOptions::new(),
            )
            .await?;
        Ok(listings)
    }

    #[instrument(skip(self))]
    async fn list_for_product(
        &self,
        product_id: ObjectId,
    ) -> StoreProductResult<Vec<StoreProductWithStore>> {
        let listings = self
            .repo
            .find_populated::<StoreProductWithStore>(
                doc! { "product_id": product_id },
                Lookup::by_id(STORES_COLLECTION, "store_id", "store"),
                ReadOptions::new(),
            )
            .await?;
        Ok(listings)
    }

    #[instrument(skip(self, update))]
    async fn update_by_pair(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
        update: UpdateStoreProduct,
    ) -> StoreProductResult<Option<StoreProduct>> {
        let updated = self
            .repo
            .find_one_and_update(
                Self::pair_filter(store_id, product_id),
                UpdateSpec::fields(Self::build_update_patch(update)),
            )
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn remove_by_pair(
        &self,
        store_id: ObjectId,
        product_id: ObjectId,
    ) -> StoreProductResult<Option<StoreProduct>> {
        let removed = self
            .repo
            .find_one_and_delete(Self::pair_filter(store_id, product_id))
            .await?;

        if let Some(ref listing) = removed {
            tracing::info!(listing_id = %listing.id, "Product removed from store");
        }
        Ok(removed)
    }
}
