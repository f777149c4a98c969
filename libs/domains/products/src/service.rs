//! Product Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{recomputed_sale_price, slugify, CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing catalog business logic.
///
/// Derived fields are owned here: slugs come from the name and the sale
/// price from the price inputs; neither is ever taken from the client.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product. `images` are references already uploaded by
    /// the object-storage collaborator.
    #[instrument(skip(self, input, images), fields(product_name = %input.name))]
    pub async fn create_product(
        &self,
        input: CreateProduct,
        images: Vec<String>,
    ) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let product = Product::new(input, images);
        self.repository.create(product).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// List products with optional filters
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    /// Count products matching a filter
    #[instrument(skip(self))]
    pub async fn count_products(&self, filter: ProductFilter) -> ProductResult<u64> {
        self.repository.count(filter).await
    }

    /// Update a product. When either price input changes, the sale price
    /// is recomputed from the merged current and new values; renaming
    /// refreshes the slug.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: ObjectId,
        mut input: UpdateProduct,
    ) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)?;

        if input.main_price.is_some() || input.discount_percent.is_some() {
            let main_price = input.main_price.unwrap_or(product.main_price);
            let discount_percent = input.discount_percent.unwrap_or(product.discount_percent);
            input.sale_price = Some(recomputed_sale_price(main_price, discount_percent));
        }

        if let Some(ref name) = input.name {
            input.slug = Some(slugify(name));
        }

        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::UpdateFailed)
    }

    /// Replace the product's image references
    #[instrument(skip(self, images))]
    pub async fn update_images(
        &self,
        id: ObjectId,
        images: Vec<String>,
    ) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)?;

        self.repository
            .set_images(id, images)
            .await?
            .ok_or(ProductError::UpdateFailed)
    }

    /// Set the discount percent, recomputing the sale price inside the
    /// database from the stored main price
    #[instrument(skip(self))]
    pub async fn apply_discount(
        &self,
        id: ObjectId,
        discount_percent: f64,
    ) -> ProductResult<Product> {
        if !(0.0..=100.0).contains(&discount_percent) {
            return Err(ProductError::Validation(
                "discount_percent must be between 0 and 100".to_string(),
            ));
        }

        self.repository
            .apply_discount(id, discount_percent)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Freeze a product (soft delete)
    #[instrument(skip(self))]
    pub async fn freeze_product(&self, id: ObjectId) -> ProductResult<()> {
        if !self.repository.freeze(id).await? {
            return Err(ProductError::AlreadyFrozen);
        }
        Ok(())
    }

    /// Restore a frozen product
    #[instrument(skip(self))]
    pub async fn restore_product(&self, id: ObjectId) -> ProductResult<()> {
        if !self.repository.restore(id).await? {
            return Err(ProductError::NotFrozen);
        }
        Ok(())
    }

    /// Hard delete (secondary removal path; freezing is preferred)
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound);
        }
        Ok(())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;

    fn create_input() -> CreateProduct {
        CreateProduct {
            name: "Espresso Machine".to_string(),
            description: "Twin boiler".to_string(),
            main_price: 100.0,
            discount_percent: Some(20.0),
            stock: 4,
        }
    }

    fn stored_product(main_price: f64, discount_percent: f64) -> Product {
        let mut product = Product::new(create_input(), vec![]);
        product.main_price = main_price;
        product.discount_percent = discount_percent;
        product.sale_price = crate::models::discounted_price(main_price, discount_percent);
        product
    }

    #[tokio::test]
    async fn test_create_product_derives_sale_price() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|product: &Product| {
                product.sale_price == 80.0 && product.slug == "espresso-machine"
            })
            .returning(|product| Ok(product));

        let service = ProductService::new(repo);
        let product = service.create_product(create_input(), vec![]).await.unwrap();

        assert_eq!(product.sale_price, 80.0);
    }

    #[tokio::test]
    async fn test_create_product_rejects_bad_discount() {
        let repo = MockProductRepository::new();
        let service = ProductService::new(repo);

        let mut input = create_input();
        input.discount_percent = Some(120.0);

        let err = service.create_product(input, vec![]).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_recomputes_sale_price_with_floor() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Ok(Some(stored_product(10.0, 95.0))));
        repo.expect_update()
            .withf(|_, update| update.sale_price == Some(1.0))
            .returning(|_, _| Ok(Some(stored_product(10.0, 100.0))));

        let service = ProductService::new(repo);
        let update = UpdateProduct {
            discount_percent: Some(100.0),
            ..Default::default()
        };

        service.update_product(ObjectId::new(), update).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_merges_stored_discount_when_only_price_changes() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Ok(Some(stored_product(100.0, 20.0))));
        repo.expect_update()
            .withf(|_, update| update.sale_price == Some(160.0))
            .returning(|_, _| Ok(Some(stored_product(200.0, 20.0))));

        let service = ProductService::new(repo);
        let update = UpdateProduct {
            main_price: Some(200.0),
            ..Default::default()
        };

        service.update_product(ObjectId::new(), update).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_without_price_inputs_leaves_sale_price_alone() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Ok(Some(stored_product(100.0, 20.0))));
        repo.expect_update()
            .withf(|_, update| update.sale_price.is_none() && update.slug == Some("new-name".to_string()))
            .returning(|_, _| Ok(Some(stored_product(100.0, 20.0))));

        let service = ProductService::new(repo);
        let update = UpdateProduct {
            name: Some("New Name!".to_string()),
            ..Default::default()
        };

        service.update_product(ObjectId::new(), update).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_product_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = ProductService::new(repo);
        let err = service
            .update_product(ObjectId::new(), UpdateProduct::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_freeze_twice_conflicts() {
        let mut repo = MockProductRepository::new();
        repo.expect_freeze().returning(|_| Ok(false));

        let service = ProductService::new(repo);
        let err = service.freeze_product(ObjectId::new()).await.unwrap_err();

        assert!(matches!(err, ProductError::AlreadyFrozen));
        assert_eq!(err.to_string(), "Product not found or already frozen");
    }

    #[tokio::test]
    async fn test_restore_unfrozen_conflicts() {
        let mut repo = MockProductRepository::new();
        repo.expect_restore().returning(|_| Ok(false));

        let service = ProductService::new(repo);
        let err = service.restore_product(ObjectId::new()).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFrozen));
    }

    #[tokio::test]
    async fn test_apply_discount_validates_range() {
        let repo = MockProductRepository::new();
        let service = ProductService::new(repo);

        let err = service
            .apply_discount(ObjectId::new(), 120.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }
}
