//! # Product Repository
//!
//! Products are keyed by EAN. A second insert of the same EAN leaves the
//! stored product untouched and returns it.

use std::time::Duration;

use async_trait::async_trait;
use shopagg_core::Product;
use shopagg_service::{ProductStorer, StorageResult};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::timed;

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        ProductRepository { pool, query_timeout }
    }

    pub async fn insert_product(&self, product: &Product) -> DbResult<Product> {
        debug!(ean = %product.ean, "Inserting product");

        // The no-op update makes RETURNING yield the existing row on conflict.
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Product>(
                r#"
                INSERT INTO product (product_id, ean, product_name, brand_id)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(ean) DO UPDATE SET ean = excluded.ean
                RETURNING product_id, ean, product_name, brand_id
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&product.ean)
            .bind(&product.product_name)
            .bind(&product.brand_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn product_by_ean(&self, ean: &str) -> DbResult<Option<Product>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Product>(
                "SELECT product_id, ean, product_name, brand_id FROM product WHERE ean = ?1",
            )
            .bind(ean)
            .fetch_optional(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl ProductStorer for ProductRepository {
    async fn insert_product(&self, product: &Product) -> StorageResult<Product> {
        Ok(self.insert_product(product).await?)
    }

    async fn product_by_ean(&self, ean: &str) -> StorageResult<Option<Product>> {
        Ok(self.product_by_ean(ean).await?)
    }
}
