//! MongoDB implementation of StoreRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongo::{ReadOptions, Repository, UpdateSpec};
use mongodb::bson::{doc, oid::ObjectId, to_bson, Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::instrument;

use crate::error::{StoreError, StoreResult};
use crate::models::{Store, StoreFilter, UpdateStore};
use crate::repository::StoreRepository;

const COLLECTION: &str = "stores";

/// MongoDB implementation of the StoreRepository
pub struct MongoStoreRepository {
    repo: Repository<Store>,
}

impl MongoStoreRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    /// Bind to a custom collection name (isolated test databases)
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            repo: Repository::new(db.collection::<Store>(collection_name)),
        }
    }

    /// Create the 2dsphere location index. Idempotent. The geospatial
    /// query helpers that use it live outside this crate.
    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let location = IndexModel::builder()
            .keys(doc! { "location": "2dsphere" })
            .options(IndexOptions::builder().build())
            .build();
        self.repo.collection().create_indexes(vec![location]).await?;
        Ok(())
    }

    /// Build a MongoDB filter document from StoreFilter
    fn build_filter(filter: &StoreFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref name_search) = filter.name_search {
            doc.insert("name", doc! { "$regex": name_search, "$options": "i" });
        }

        if let Some(ref category) = filter.category {
            doc.insert("categories", category);
        }

        if let Some(ref categories) = filter.categories {
            doc.insert("categories", doc! { "$in": categories });
        }

        doc
    }

    fn build_update_patch(update: UpdateStore) -> Document {
        let mut fields = doc! {};
        if let Some(name) = update.name {
            fields.insert("name", name.trim());
        }
        if let Some(address) = update.address {
            fields.insert("address", address.trim());
        }
        if let Some(phone) = update.phone {
            fields.insert("phone", phone.trim());
        }
        if let Some(location) = update.location {
            fields.insert("location", to_bson(&location).unwrap_or(Bson::Null));
        }
        if let Some(categories) = update.categories {
            fields.insert("categories", categories);
        }
        fields.insert("updated_at", Utc::now().to_rfc3339());
        fields
    }
}

#[async_trait]
impl StoreRepository for MongoStoreRepository {
    #[instrument(skip(self, store), fields(store_name = %store.name))]
    async fn create(&self, store: Store) -> StoreResult<Store> {
        let mut created = self.repo.create(vec![store]).await?;

        match created.pop() {
            Some(store) => {
                tracing::info!(store_id = %store.id, "Store created successfully");
                Ok(store)
            }
            None => Err(StoreError::CreateFailed),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> StoreResult<Option<Store>> {
        let store = self
            .repo
            .find_one(doc! { "_id": id }, ReadOptions::new())
            .await?;
        Ok(store)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: StoreFilter) -> StoreResult<Vec<Store>> {
        let options = ReadOptions::new()
            .sort(doc! { "created_at": -1 })
            .skip(filter.offset)
            .limit(filter.limit);

        let stores = self.repo.find(Self::build_filter(&filter), options).await?;
        Ok(stores)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: StoreFilter) -> StoreResult<u64> {
        let count = self
            .repo
            .collection()
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: ObjectId, update: UpdateStore) -> StoreResult<Option<Store>> {
        let updated = self
            .repo
            .find_by_id_and_update(id, UpdateSpec::fields(Self::build_update_patch(update)))
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> StoreResult<Option<Store>> {
        let deleted = self.repo.find_one_and_delete(doc! { "_id": id }).await?;

        if let Some(ref store) = deleted {
            tracing::info!(store_id = %store.id, "Store deleted");
        }
        Ok(deleted)
    }
}
