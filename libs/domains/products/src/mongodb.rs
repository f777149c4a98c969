//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongo::{ReadOptions, Repository, UpdateSpec};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Database;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

const COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    repo: Repository<Product>,
}

impl MongoProductRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    /// Bind to a custom collection name (isolated test databases)
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            repo: Repository::new(db.collection::<Product>(collection_name)),
        }
    }

    /// Build a MongoDB filter document from ProductFilter
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(frozen) = filter.frozen {
            doc.insert("freezed_at", doc! { "$exists": frozen });
        }

        if let Some(ref search) = filter.search {
            doc.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": search, "$options": "i" } },
                    doc! { "description": { "$regex": search, "$options": "i" } },
                ],
            );
        }

        doc
    }

    fn build_update_patch(update: UpdateProduct) -> Document {
        let mut fields = doc! {};
        if let Some(name) = update.name {
            fields.insert("name", name);
        }
        if let Some(description) = update.description {
            fields.insert("description", description);
        }
        if let Some(main_price) = update.main_price {
            fields.insert("main_price", main_price);
        }
        if let Some(discount_percent) = update.discount_percent {
            fields.insert("discount_percent", discount_percent);
        }
        if let Some(stock) = update.stock {
            fields.insert("stock", stock);
        }
        if let Some(sale_price) = update.sale_price {
            fields.insert("sale_price", sale_price);
        }
        if let Some(slug) = update.slug {
            fields.insert("slug", slug);
        }
        fields.insert("updated_at", Utc::now().to_rfc3339());
        fields
    }

    /// Pipeline recomputing the sale price from the stored main price.
    /// The terminal stage floors a non-positive result at 1, mirroring
    /// the service-side recomputation.
    fn discount_pipeline(discount_percent: f64) -> Vec<Document> {
        vec![
            doc! { "$set": {
                "discount_percent": discount_percent,
                "updated_at": Utc::now().to_rfc3339(),
            } },
            doc! { "$set": {
                "sale_price": { "$subtract": ["$main_price", {
                    "$multiply": ["$main_price", { "$divide": ["$discount_percent", 100.0] }]
                }] },
            } },
            doc! { "$set": {
                "sale_price": {
                    "$cond": [{ "$gt": ["$sale_price", 0.0] }, "$sale_price", 1.0]
                },
            } },
        ]
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let mut created = self.repo.create(vec![product]).await?;

        match created.pop() {
            Some(product) => {
                tracing::info!(product_id = %product.id, "Product created successfully");
                Ok(product)
            }
            None => Err(ProductError::CreateFailed),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let product = self
            .repo
            .find_one(doc! { "_id": id }, ReadOptions::new())
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let options = ReadOptions::new()
            .sort(doc! { "created_at": -1 })
            .skip(filter.offset)
            .limit(filter.limit);

        let products = self
            .repo
            .find(Self::build_filter(&filter), options)
            .await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .repo
            .collection()
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: ObjectId, update: UpdateProduct) -> ProductResult<Option<Product>> {
        let updated = self
            .repo
            .find_by_id_and_update(id, UpdateSpec::fields(Self::build_update_patch(update)))
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self, images))]
    async fn set_images(
        &self,
        id: ObjectId,
        images: Vec<String>,
    ) -> ProductResult<Option<Product>> {
        let updated = self
            .repo
            .find_by_id_and_update(
                id,
                UpdateSpec::fields(doc! {
                    "images": images,
                    "updated_at": Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn apply_discount(
        &self,
        id: ObjectId,
        discount_percent: f64,
    ) -> ProductResult<Option<Product>> {
        let updated = self
            .repo
            .find_by_id_and_update(
                id,
                UpdateSpec::pipeline(Self::discount_pipeline(discount_percent)),
            )
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn freeze(&self, id: ObjectId) -> ProductResult<bool> {
        let now = Utc::now().to_rfc3339();
        let result = self
            .repo
            .update_one(
                doc! { "_id": id, "freezed_at": { "$exists": false } },
                UpdateSpec::patch(doc! {
                    "$set": { "freezed_at": now.clone(), "updated_at": now },
                }),
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn restore(&self, id: ObjectId) -> ProductResult<bool> {
        let now = Utc::now().to_rfc3339();
        let result = self
            .repo
            .update_one(
                doc! { "_id": id, "freezed_at": { "$exists": true } },
                UpdateSpec::patch(doc! {
                    "$unset": { "freezed_at": 1, "freezed_by": 1 },
                    "$set": { "restored_at": now.clone(), "updated_at": now },
                }),
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let result = self.repo.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_active_only() {
        let filter = ProductFilter {
            frozen: Some(false),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(!doc
            .get_document("freezed_at")
            .unwrap()
            .get_bool("$exists")
            .unwrap());
    }

    #[test]
    fn test_build_filter_with_search() {
        let filter = ProductFilter {
            search: Some("espresso".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.contains_key("$or"));
    }

    #[test]
    fn test_build_update_patch_skips_absent_fields() {
        let update = UpdateProduct {
            main_price: Some(42.0),
            ..Default::default()
        };
        let patch = MongoProductRepository::build_update_patch(update);

        assert_eq!(patch.get_f64("main_price").unwrap(), 42.0);
        assert!(!patch.contains_key("name"));
        assert!(!patch.contains_key("sale_price"));
        assert!(patch.contains_key("updated_at"));
    }

    #[test]
    fn test_build_update_patch_carries_derived_fields() {
        let update = UpdateProduct {
            name: Some("New Name".to_string()),
            sale_price: Some(80.0),
            slug: Some("new-name".to_string()),
            ..Default::default()
        };
        let patch = MongoProductRepository::build_update_patch(update);

        assert_eq!(patch.get_f64("sale_price").unwrap(), 80.0);
        assert_eq!(patch.get_str("slug").unwrap(), "new-name");
    }

    #[test]
    fn test_discount_pipeline_floors_with_terminal_cond() {
        let stages = MongoProductRepository::discount_pipeline(100.0);

        assert_eq!(stages.len(), 3);
        assert_eq!(
            stages[0].get_document("$set").unwrap().get_f64("discount_percent").unwrap(),
            100.0
        );
        let last = stages[2].get_document("$set").unwrap();
        assert!(last.get_document("sale_price").unwrap().contains_key("$cond"));
    }
}
