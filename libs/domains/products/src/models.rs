use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity - represents a catalog product stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// URL-safe handle derived from the name. Human-readable, not unique.
    pub slug: String,
    pub description: String,
    /// Object-storage references; uploading is the storage collaborator's job
    #[serde(default)]
    pub images: Vec<String>,
    pub main_price: f64,
    /// Percentage 0-100
    #[serde(default)]
    pub discount_percent: f64,
    /// Derived: main_price x (1 - discount_percent/100). Recomputed
    /// server-side on every price-affecting update, floored at 1.
    pub sale_price: f64,
    pub stock: i64,
    #[serde(default)]
    pub sold_items: i64,
    /// Soft-delete lifecycle: a frozen product has freezed_at set
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub freezed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub freezed_by: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub restored_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub restored_by: Option<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by every update-family write
    #[serde(default)]
    pub revision: i64,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 2, max = 2000))]
    pub name: String,
    #[validate(length(min = 2, max = 5000))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub main_price: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percent: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: i64,
}

/// DTO for updating an existing product.
///
/// `sale_price` and `slug` are derived fields: the service fills them in
/// after recomputation and they are never read from client input.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 2, max = 2000))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub main_price: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percent: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    #[serde(skip)]
    pub sale_price: Option<f64>,
    #[serde(skip)]
    pub slug: Option<String>,
}

/// Query filters for listing products
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFilter {
    /// Some(true) = frozen only, Some(false) = active only, None = all
    pub frozen: Option<bool>,
    /// Search in name and description
    pub search: Option<String>,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of results to skip
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> i64 {
    50
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            frozen: None,
            search: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// URL-safe slug: lowercase, alphanumeric runs joined by single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Raw discounted price, applied at creation time.
pub fn discounted_price(main_price: f64, discount_percent: f64) -> f64 {
    main_price - main_price * (discount_percent / 100.0)
}

/// Recomputed sale price for updates: the raw discounted price, floored
/// at 1 when the discount would drive it to zero or below.
pub fn recomputed_sale_price(main_price: f64, discount_percent: f64) -> f64 {
    let price = discounted_price(main_price, discount_percent);
    if price > 0.0 {
        price
    } else {
        1.0
    }
}

impl Product {
    /// Create a new product from the DTO and already-uploaded image
    /// references. Slug and sale price are derived here.
    pub fn new(input: CreateProduct, images: Vec<String>) -> Self {
        let now = Utc::now();
        let discount_percent = input.discount_percent.unwrap_or(0.0);
        Self {
            id: ObjectId::new(),
            slug: slugify(&input.name),
            sale_price: discounted_price(input.main_price, discount_percent),
            name: input.name,
            description: input.description,
            images,
            main_price: input.main_price,
            discount_percent,
            stock: input.stock,
            sold_items: 0,
            freezed_at: None,
            freezed_by: None,
            restored_at: None,
            restored_by: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.freezed_at.is_some()
    }
}
