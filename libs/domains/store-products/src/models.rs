use chrono::{DateTime, Utc};
use domain_products::Product;
use domain_stores::Store;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Store-product relationship entity. Uniqueness is defined by the
/// (store_id, product_id) pair, not by the surrogate `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProduct {
    /// Surrogate identifier (stored as _id in MongoDB)
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub store_id: ObjectId,
    pub product_id: ObjectId,
    /// Store-specific price
    pub price: f64,
    /// Store-specific stock
    pub stock: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by every update-family write
    #[serde(default)]
    pub revision: i64,
}

fn default_true() -> bool {
    true
}

/// DTO for adding a product to a store
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddStoreProduct {
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// DTO for updating a relationship: any subset of price, stock and
/// availability
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStoreProduct {
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub is_available: Option<bool>,
}

/// Relationship row with the product reference populated
#[derive(Debug, Clone, Deserialize)]
pub struct StoreProductWithProduct {
    #[serde(flatten)]
    pub listing: StoreProduct,
    pub product: Product,
}

/// Relationship row with the store reference populated
#[derive(Debug, Clone, Deserialize)]
pub struct StoreProductWithStore {
    #[serde(flatten)]
    pub listing: StoreProduct,
    pub store: Store,
}

impl StoreProduct {
    pub fn new(store_id: ObjectId, product_id: ObjectId, input: AddStoreProduct) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            store_id,
            product_id,
            price: input.price,
            stock: input.stock,
            is_available: input.is_available,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }
}
