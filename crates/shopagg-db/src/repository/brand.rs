//! # Brand Repository
//!
//! Brand names are unique; inserting a known name returns the stored row.

use std::time::Duration;

use async_trait::async_trait;
use shopagg_core::Brand;
use shopagg_service::{BrandStorer, ProductBrandStorer, StorageResult};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::timed;

#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl BrandRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        BrandRepository { pool, query_timeout }
    }

    pub async fn insert_brand(&self, name: &str) -> DbResult<Brand> {
        debug!(brand_name = %name, "Inserting brand");

        timed(
            self.query_timeout,
            sqlx::query_as::<_, Brand>(
                r#"
                INSERT INTO brand (brand_id, brand_name)
                VALUES (?1, ?2)
                ON CONFLICT(brand_name) DO UPDATE SET brand_name = excluded.brand_name
                RETURNING brand_id, brand_name
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(name)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn brand_by_name(&self, name: &str) -> DbResult<Option<Brand>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Brand>(
                "SELECT brand_id, brand_name FROM brand WHERE brand_name = ?1",
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn brands_by_prefix(&self, prefix: &str) -> DbResult<Vec<Brand>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Brand>(
                r#"
                SELECT brand_id, brand_name
                FROM brand
                WHERE substr(brand_name, 1, length(?1)) = ?1
                ORDER BY brand_name
                "#,
            )
            .bind(prefix)
            .fetch_all(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl BrandStorer for BrandRepository {
    async fn insert_brand(&self, name: &str) -> StorageResult<Brand> {
        Ok(BrandRepository::insert_brand(self, name).await?)
    }

    async fn brand_by_name(&self, name: &str) -> StorageResult<Option<Brand>> {
        Ok(BrandRepository::brand_by_name(self, name).await?)
    }

    async fn brands_by_prefix(&self, prefix: &str) -> StorageResult<Vec<Brand>> {
        Ok(self.brands_by_prefix(prefix).await?)
    }
}

#[async_trait]
impl ProductBrandStorer for BrandRepository {
    async fn brand_by_name(&self, name: &str) -> StorageResult<Option<Brand>> {
        Ok(BrandRepository::brand_by_name(self, name).await?)
    }

    async fn insert_brand(&self, name: &str) -> StorageResult<Brand> {
        Ok(BrandRepository::insert_brand(self, name).await?)
    }
}
