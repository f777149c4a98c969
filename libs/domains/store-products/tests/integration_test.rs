//! Integration tests for the store-product relationship workflow
//!
//! These run against a real MongoDB (`MONGODB_URL`, defaulting to
//! localhost) and are ignored by default:
//!
//! ```text
//! cargo test -p domain_store_products -- --ignored
//! ```

use domain_products::{CreateProduct, MongoProductRepository, Product, ProductRepository};
use domain_store_products::{
    AddStoreProduct, MongoStoreProductRepository, StoreProductError, StoreProductService,
    UpdateStoreProduct,
};
use domain_stores::{CreateStore, GeoPoint, MongoStoreRepository, Store, StoreRepository};
use mongodb::{Client, Database};

async fn test_db(name: &str) -> Database {
    let url =
        std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = Client::with_uri_str(&url).await.unwrap();
    let db = client.database(name);
    db.drop().await.ok();
    db
}

fn service_for(
    db: &Database,
) -> StoreProductService<MongoStoreProductRepository, MongoStoreRepository, MongoProductRepository>
{
    StoreProductService::new(
        MongoStoreProductRepository::new(db.clone()),
        MongoStoreRepository::new(db.clone()),
        MongoProductRepository::new(db.clone()),
    )
}

async fn seed_store(db: &Database, name: &str) -> Store {
    MongoStoreRepository::new(db.clone())
        .create(Store::new(CreateStore {
            name: name.to_string(),
            address: "12 Nile St".to_string(),
            phone: "0221234567".to_string(),
            location: GeoPoint::new(31.2357, 30.0444),
            categories: vec!["grocery".to_string()],
        }))
        .await
        .unwrap()
}

async fn seed_product(db: &Database) -> Product {
    MongoProductRepository::new(db.clone())
        .create(Product::new(
            CreateProduct {
                name: "Espresso Machine".to_string(),
                description: "Twin boiler".to_string(),
                main_price: 100.0,
                discount_percent: Some(20.0),
                stock: 4,
            },
            vec![],
        ))
        .await
        .unwrap()
}

fn listing_terms(price: f64) -> AddStoreProduct {
    AddStoreProduct {
        price,
        stock: 5,
        is_available: true,
    }
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_update_one_store_leaves_the_other_untouched() {
    let db = test_db("catalog_sp_isolation_test").await;
    let service = service_for(&db);

    let store_a = seed_store(&db, "Store A").await;
    let store_b = seed_store(&db, "Store B").await;
    let product = seed_product(&db).await;

    service
        .add_product_to_store(store_a.id, product.id, listing_terms(10.0))
        .await
        .unwrap();
    service
        .add_product_to_store(store_b.id, product.id, listing_terms(20.0))
        .await
        .unwrap();

    let updated = service
        .update_store_product(
            store_a.id,
            product.id,
            UpdateStoreProduct {
                price: Some(15.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 15.0);
    assert_eq!(updated.revision, 1);

    let b_rows = service.get_store_products(store_b.id).await.unwrap();
    assert_eq!(b_rows.len(), 1);
    assert_eq!(b_rows[0].listing.price, 20.0);
    assert_eq!(b_rows[0].listing.revision, 0);
    assert_eq!(b_rows[0].product.name, "Espresso Machine");
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_duplicate_pair_rejected_by_unique_index() {
    let db = test_db("catalog_sp_duplicate_test").await;
    let repository = MongoStoreProductRepository::new(db.clone());
    repository.ensure_indexes().await.unwrap();

    let service = StoreProductService::new(
        repository,
        MongoStoreRepository::new(db.clone()),
        MongoProductRepository::new(db.clone()),
    );

    let store = seed_store(&db, "Store A").await;
    let product = seed_product(&db).await;

    service
        .add_product_to_store(store.id, product.id, listing_terms(10.0))
        .await
        .unwrap();

    let err = service
        .add_product_to_store(store.id, product.id, listing_terms(12.0))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreProductError::AlreadyListed));
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_remove_returns_row_then_misses() {
    let db = test_db("catalog_sp_remove_test").await;
    let service = service_for(&db);

    let store = seed_store(&db, "Store A").await;
    let product = seed_product(&db).await;

    service
        .add_product_to_store(store.id, product.id, listing_terms(10.0))
        .await
        .unwrap();

    let removed = service
        .remove_product_from_store(store.id, product.id)
        .await
        .unwrap();
    assert_eq!(removed.price, 10.0);

    let err = service
        .remove_product_from_store(store.id, product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreProductError::RelationshipNotFound));
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_repeated_updates_keep_incrementing_revision() {
    let db = test_db("catalog_sp_revision_test").await;
    let service = service_for(&db);

    let store = seed_store(&db, "Store A").await;
    let product = seed_product(&db).await;

    service
        .add_product_to_store(store.id, product.id, listing_terms(10.0))
        .await
        .unwrap();

    for expected_revision in 1i64..=3 {
        let updated = service
            .update_store_product(
                store.id,
                product.id,
                UpdateStoreProduct {
                    stock: Some(expected_revision),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.revision, expected_revision);
    }
}
