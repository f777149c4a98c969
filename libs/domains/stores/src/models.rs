use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// GeoJSON Point: coordinates are [longitude, latitude]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

pub fn validate_geo_point(point: &GeoPoint) -> Result<(), ValidationError> {
    if point.kind != "Point" {
        return Err(ValidationError::new("geo_type").with_message("type must be 'Point'".into()));
    }
    if !(-180.0..=180.0).contains(&point.longitude()) {
        return Err(ValidationError::new("longitude")
            .with_message("longitude must be between -180 and 180".into()));
    }
    if !(-90.0..=90.0).contains(&point.latitude()) {
        return Err(ValidationError::new("latitude")
            .with_message("latitude must be between -90 and 90".into()));
    }
    Ok(())
}

fn validate_categories(categories: &Vec<String>) -> Result<(), ValidationError> {
    if categories.iter().any(|c| c.trim().is_empty()) {
        return Err(
            ValidationError::new("categories").with_message("categories must be non-empty".into())
        );
    }
    Ok(())
}

/// Store entity - represents a physical store stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// GeoJSON location, indexed 2dsphere
    pub location: GeoPoint,
    /// Non-empty category tags
    #[serde(default)]
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by every update-family write
    #[serde(default)]
    pub revision: i64,
}

/// DTO for creating a new store
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStore {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    #[validate(custom(function = validate_geo_point))]
    pub location: GeoPoint,
    #[validate(length(min = 1), custom(function = validate_categories))]
    pub categories: Vec<String>,
}

/// DTO for updating an existing store
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStore {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 5, max = 20))]
    pub phone: Option<String>,
    #[validate(custom(function = validate_geo_point))]
    pub location: Option<GeoPoint>,
    #[validate(length(min = 1), custom(function = validate_categories))]
    pub categories: Option<Vec<String>>,
}

/// Query filters for listing stores
#[derive(Debug, Clone, Deserialize)]
pub struct StoreFilter {
    /// Case-insensitive name pattern
    pub name_search: Option<String>,
    /// Stores carrying this category tag
    pub category: Option<String>,
    /// Stores carrying any of these category tags
    pub categories: Option<Vec<String>>,
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

impl Default for StoreFilter {
    fn default() -> Self {
        Self {
            name_search: None,
            category: None,
            categories: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// One page of stores plus pagination bookkeeping
#[derive(Debug, Clone, Serialize)]
pub struct StorePage {
    pub stores: Vec<Store>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl Store {
    /// Create a new store from the DTO, trimming the free-text fields
    pub fn new(input: CreateStore) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: input.name.trim().to_string(),
            address: input.address.trim().to_string(),
            phone: input.phone.trim().to_string(),
            location: input.location,
            categories: input.categories,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateStore {
        CreateStore {
            name: " Downtown Branch ".to_string(),
            address: "12 Nile St".to_string(),
            phone: "0221234567".to_string(),
            location: GeoPoint::new(31.2357, 30.0444),
            categories: vec!["grocery".to_string()],
        }
    }

    #[test]
    fn test_new_trims_text_fields() {
        let store = Store::new(create_input());
        assert_eq!(store.name, "Downtown Branch");
        assert_eq!(store.revision, 0);
    }

    #[test]
    fn test_geo_point_accessors() {
        let point = GeoPoint::new(31.2357, 30.0444);
        assert_eq!(point.kind, "Point");
        assert_eq!(point.longitude(), 31.2357);
        assert_eq!(point.latitude(), 30.0444);
    }

    #[test]
    fn test_longitude_out_of_range_rejected() {
        let mut input = create_input();
        input.location = GeoPoint::new(181.0, 0.0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_latitude_out_of_range_rejected() {
        let mut input = create_input();
        input.location = GeoPoint::new(0.0, -91.0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_empty_category_list_rejected() {
        let mut input = create_input();
        input.categories = vec![];
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_blank_category_tag_rejected() {
        let mut input = create_input();
        input.categories = vec!["grocery".to_string(), "  ".to_string()];
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_valid_store_passes() {
        assert!(create_input().validate().is_ok());
    }
}
