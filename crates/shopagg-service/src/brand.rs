//! # Brands
//!
//! Explicit brand creation refuses names that already exist; products
//! resolve their brand through [`ProductService`] instead, which reuses it.
//!
//! [`ProductService`]: crate::product::ProductService

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{Brand, CoreError, CoreResult};
use tracing::info;

use crate::storage::{fail, StorageResult};

#[async_trait]
pub trait BrandStorer: Send + Sync {
    /// Inserts a brand; on a name conflict the stored row comes back.
    async fn insert_brand(&self, name: &str) -> StorageResult<Brand>;

    async fn brand_by_name(&self, name: &str) -> StorageResult<Option<Brand>>;

    async fn brands_by_prefix(&self, prefix: &str) -> StorageResult<Vec<Brand>>;
}

#[derive(Clone)]
pub struct BrandService {
    brands: Arc<dyn BrandStorer>,
}

impl BrandService {
    pub fn new(brands: Arc<dyn BrandStorer>) -> Self {
        BrandService { brands }
    }

    /// Creates a brand.
    ///
    /// ## Errors
    /// [`CoreError::BrandExists`] when the name is taken. Two concurrent
    /// creations of the same new name both succeed with the same row.
    pub async fn create(&self, name: &str) -> CoreResult<Brand> {
        let existing = self
            .brands
            .brand_by_name(name)
            .await
            .map_err(fail("brand create: lookup", CoreError::BrandError))?;

        if existing.is_some() {
            return Err(CoreError::BrandExists);
        }

        let brand = self
            .brands
            .insert_brand(name)
            .await
            .map_err(fail("brand create: insert", CoreError::BrandError))?;

        info!(brand_id = %brand.brand_id, brand_name = %brand.brand_name, "Brand created");
        Ok(brand)
    }

    pub async fn by_partial_name(&self, prefix: &str) -> CoreResult<Vec<Brand>> {
        self.brands
            .brands_by_prefix(prefix)
            .await
            .map_err(fail("brands by partial name", CoreError::BrandError))
    }
}
