//! # Products
//!
//! Products are identified by EAN. Creating a product whose EAN is already
//! known returns the stored product untouched, whatever name or brand the
//! second request carried.

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{Brand, CoreError, CoreResult, Product};
use tracing::{debug, info};

use crate::storage::{fail, StorageResult};

#[async_trait]
pub trait ProductBrandStorer: Send + Sync {
    async fn brand_by_name(&self, name: &str) -> StorageResult<Option<Brand>>;

    async fn insert_brand(&self, name: &str) -> StorageResult<Brand>;
}

#[async_trait]
pub trait ProductStorer: Send + Sync {
    /// Inserts a product; on an EAN conflict the stored row comes back.
    async fn insert_product(&self, product: &Product) -> StorageResult<Product>;

    async fn product_by_ean(&self, ean: &str) -> StorageResult<Option<Product>>;
}

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStorer>,
    brands: Arc<dyn ProductBrandStorer>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStorer>, brands: Arc<dyn ProductBrandStorer>) -> Self {
        ProductService { products, brands }
    }

    /// Brand with exactly `name`, created when absent.
    pub async fn create_or_get_brand(&self, name: &str) -> CoreResult<Brand> {
        let found = self
            .brands
            .brand_by_name(name)
            .await
            .map_err(fail("create_or_get_brand: lookup", CoreError::BrandError))?;

        match found {
            Some(brand) => Ok(brand),
            None => self
                .brands
                .insert_brand(name)
                .await
                .map_err(fail("create_or_get_brand: insert", CoreError::BrandError)),
        }
    }

    /// Registers `product` under `brand_name`, or returns the product that
    /// already owns its EAN.
    pub async fn create(&self, product: &Product, brand_name: &str) -> CoreResult<Product> {
        let brand = self.create_or_get_brand(brand_name).await?;

        let existing = self
            .products
            .product_by_ean(&product.ean)
            .await
            .map_err(fail("product create: lookup", CoreError::ProductError))?;

        if let Some(existing) = existing {
            debug!(ean = %existing.ean, product_id = %existing.product_id, "Product already known");
            return Ok(existing);
        }

        let product = Product {
            brand_id: brand.brand_id,
            ..product.clone()
        };

        let created = self
            .products
            .insert_product(&product)
            .await
            .map_err(fail("product create: insert", CoreError::ProductError))?;

        info!(product_id = %created.product_id, ean = %created.ean, "Product created");
        Ok(created)
    }

    /// ## Errors
    /// [`CoreError::NotExistsError`] when no product has this EAN.
    pub async fn product_by_ean(&self, ean: &str) -> CoreResult<Product> {
        self.products
            .product_by_ean(ean)
            .await
            .map_err(fail("product_by_ean", CoreError::ProductError))?
            .ok_or(CoreError::NotExistsError)
    }
}
