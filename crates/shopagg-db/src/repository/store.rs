//! # Store Repository
//!
//! ## Search Rules
//! ```text
//! shop ──► zip_code starts with the search text (any store type)
//! web  ──► store_type = 'web' AND store_name contains the search text
//! ```
//!
//! Shop locations are unique per (company, zip code, city, address); an
//! insert that hits that index returns the stored shop.

use std::time::Duration;

use async_trait::async_trait;
use shopagg_core::{Store, StoreType};
use shopagg_service::{BillStoreStorer, StorageResult, StoreStorer};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::timed;

const STORE_COLUMNS: &str =
    "store_id, address, zip_code, city, country, store_name, store_type, url, company_id";

#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        StoreRepository { pool, query_timeout }
    }

    pub async fn insert_store(&self, store: &Store) -> DbResult<Store> {
        debug!(store_type = %store.store_type, company_id = %store.company_id, "Inserting store");

        let sql = format!(
            r#"
            INSERT INTO store ({STORE_COLUMNS})
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(company_id, zip_code, city, address) WHERE store_type = 'shop'
            DO UPDATE SET company_id = excluded.company_id
            RETURNING {STORE_COLUMNS}
            "#
        );

        timed(
            self.query_timeout,
            sqlx::query_as::<_, Store>(&sql)
                .bind(Uuid::new_v4().to_string())
                .bind(&store.address)
                .bind(&store.zip_code)
                .bind(&store.city)
                .bind(&store.country)
                .bind(&store.store_name)
                .bind(store.store_type)
                .bind(&store.url)
                .bind(&store.company_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn store_by_id(&self, store_id: &str) -> DbResult<Option<Store>> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM store WHERE store_id = ?1");
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Store>(&sql)
                .bind(store_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn search_stores(&self, store_type: StoreType, search: &str) -> DbResult<Vec<Store>> {
        let sql = match store_type {
            StoreType::Shop => format!(
                "SELECT {STORE_COLUMNS} FROM store \
                 WHERE substr(zip_code, 1, length(?1)) = ?1 \
                 ORDER BY zip_code, store_name"
            ),
            StoreType::Web => format!(
                "SELECT {STORE_COLUMNS} FROM store \
                 WHERE store_type = 'web' AND instr(store_name, ?1) > 0 \
                 ORDER BY store_name"
            ),
        };

        let stores = timed(
            self.query_timeout,
            sqlx::query_as::<_, Store>(&sql)
                .bind(search)
                .fetch_all(&self.pool),
        )
        .await?;

        debug!(store_type = %store_type, count = stores.len(), "Store search");
        Ok(stores)
    }
}

#[async_trait]
impl StoreStorer for StoreRepository {
    async fn insert_store(&self, store: &Store) -> StorageResult<Store> {
        Ok(self.insert_store(store).await?)
    }

    async fn search_stores(
        &self,
        store_type: StoreType,
        search: &str,
    ) -> StorageResult<Vec<Store>> {
        Ok(self.search_stores(store_type, search).await?)
    }
}

#[async_trait]
impl BillStoreStorer for StoreRepository {
    async fn store_by_id(&self, store_id: &str) -> StorageResult<Option<Store>> {
        Ok(self.store_by_id(store_id).await?)
    }
}
