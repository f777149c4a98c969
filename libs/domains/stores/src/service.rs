//! Store Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{StoreError, StoreResult};
use crate::models::{CreateStore, Store, StoreFilter, StorePage, UpdateStore};
use crate::repository::StoreRepository;

/// Store service providing store management operations
pub struct StoreService<R: StoreRepository> {
    repository: Arc<R>,
}

impl<R: StoreRepository> StoreService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new store
    #[instrument(skip(self, input), fields(store_name = %input.name))]
    pub async fn create_store(&self, input: CreateStore) -> StoreResult<Store> {
        input
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        self.repository.create(Store::new(input)).await
    }

    /// Get a store by ID
    #[instrument(skip(self))]
    pub async fn get_store(&self, id: ObjectId) -> StoreResult<Store> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// List stores with optional filters
    #[instrument(skip(self))]
    pub async fn list_stores(&self, filter: StoreFilter) -> StoreResult<Vec<Store>> {
        self.repository.list(filter).await
    }

    /// List one page of stores with pagination bookkeeping.
    /// Pages are 1-based; a page below 1 is treated as page 1.
    #[instrument(skip(self))]
    pub async fn list_paginated(&self, page: u64, limit: i64) -> StoreResult<StorePage> {
        let page = page.max(1);
        let limit = limit.max(1);

        let filter = StoreFilter {
            limit,
            offset: (page - 1) * limit as u64,
            ..Default::default()
        };

        let total = self.repository.count(StoreFilter::default()).await?;
        let stores = self.repository.list(filter).await?;

        Ok(StorePage {
            stores,
            total,
            page,
            pages: total.div_ceil(limit as u64),
        })
    }

    /// Update an existing store
    #[instrument(skip(self, input))]
    pub async fn update_store(&self, id: ObjectId, input: UpdateStore) -> StoreResult<Store> {
        input
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Delete a store and return the removed record
    #[instrument(skip(self))]
    pub async fn delete_store(&self, id: ObjectId) -> StoreResult<Store> {
        self.repository
            .delete(id)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

impl<R: StoreRepository> Clone for StoreService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
