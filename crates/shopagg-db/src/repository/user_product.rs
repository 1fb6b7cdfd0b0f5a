//! # User Product Repository
//!
//! Line items. Every read joins the row with its product, brand, bill and
//! store so clients get names alongside ids:
//!
//! ```text
//! user_product ──► product ──► brand
//!      │
//!      └─────────► bill ──► store
//! ```
//!
//! Rows come back in creation order; `rowid` breaks ties between items
//! created within the same timestamp.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shopagg_core::{NewUserProduct, QuantityUpdate, UserProduct};
use shopagg_service::{BillUserProductsStorer, StorageResult, UserProductStorer};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::timed;

const JOINED_SELECT: &str = r#"
    SELECT
        up.user_product_id,
        up.product_id,
        up.user_id,
        p.product_name,
        p.ean,
        br.brand_id,
        br.brand_name,
        s.store_id,
        s.store_name,
        up.bill_id,
        up.price,
        up.product_type,
        up.product_size,
        up.size_format,
        up.quantity
    FROM user_product up
    INNER JOIN product p ON up.product_id = p.product_id
    INNER JOIN brand br ON p.brand_id = br.brand_id
    INNER JOIN bill b ON up.bill_id = b.bill_id
    INNER JOIN store s ON b.store_id = s.store_id
"#;

#[derive(Debug, Clone)]
pub struct UserProductRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl UserProductRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        UserProductRepository { pool, query_timeout }
    }

    /// Inserts a line item and returns its generated id.
    pub async fn insert_user_product(
        &self,
        item: &NewUserProduct,
        user_id: &str,
    ) -> DbResult<String> {
        let user_product_id = Uuid::new_v4().to_string();

        debug!(
            user_product_id = %user_product_id,
            bill_id = %item.bill_id,
            product_id = %item.product_id,
            "Inserting line item"
        );

        timed(
            self.query_timeout,
            sqlx::query(
                r#"
                INSERT INTO user_product (
                    user_product_id, product_id, user_id, bill_id, price, quantity,
                    product_type, product_size, size_format, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&user_product_id)
            .bind(&item.product_id)
            .bind(user_id)
            .bind(&item.bill_id)
            .bind(&item.price)
            .bind(item.quantity)
            .bind(item.product_type)
            .bind(&item.product_size)
            .bind(&item.size_format)
            .bind(Utc::now())
            .execute(&self.pool),
        )
        .await?;

        Ok(user_product_id)
    }

    pub async fn user_product_by_id(&self, user_product_id: &str) -> DbResult<Option<UserProduct>> {
        let sql = format!("{JOINED_SELECT} WHERE up.user_product_id = ?1");
        timed(
            self.query_timeout,
            sqlx::query_as::<_, UserProduct>(&sql)
                .bind(user_product_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn user_products_by_bill_id(&self, bill_id: &str) -> DbResult<Vec<UserProduct>> {
        self.fetch_ordered("up.bill_id = ?1", bill_id).await
    }

    pub async fn user_products_by_user_id(&self, user_id: &str) -> DbResult<Vec<UserProduct>> {
        self.fetch_ordered("up.user_id = ?1", user_id).await
    }

    /// For each product the user bought at `store_id`, the latest line item.
    pub async fn recent_user_products_by_store(
        &self,
        user_id: &str,
        store_id: &str,
    ) -> DbResult<Vec<UserProduct>> {
        let sql = format!(
            r#"
            WITH recent AS (
                SELECT
                    up.user_product_id,
                    ROW_NUMBER() OVER (
                        PARTITION BY up.product_id
                        ORDER BY up.created_at DESC, up.rowid DESC
                    ) AS rn
                FROM user_product up
                INNER JOIN bill b ON up.bill_id = b.bill_id
                WHERE up.user_id = ?1 AND b.store_id = ?2
            )
            {JOINED_SELECT}
            INNER JOIN recent r ON r.user_product_id = up.user_product_id
            WHERE r.rn = 1
            ORDER BY up.created_at, up.rowid
            "#
        );

        timed(
            self.query_timeout,
            sqlx::query_as::<_, UserProduct>(&sql)
                .bind(user_id)
                .bind(store_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn update_quantity(&self, update: &QuantityUpdate) -> DbResult<()> {
        debug!(
            user_product_id = %update.user_product_id,
            quantity = update.quantity,
            "Updating quantity"
        );

        timed(
            self.query_timeout,
            sqlx::query(
                r#"
                UPDATE user_product
                SET quantity = ?1, product_type = ?2, product_size = ?3, size_format = ?4
                WHERE user_product_id = ?5
                "#,
            )
            .bind(update.quantity)
            .bind(update.product_type)
            .bind(&update.product_size)
            .bind(&update.size_format)
            .bind(&update.user_product_id)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    /// Deletes a line item and returns the bill it belonged to.
    pub async fn delete_user_product(&self, user_product_id: &str) -> DbResult<Option<String>> {
        timed(
            self.query_timeout,
            sqlx::query_scalar::<_, String>(
                "DELETE FROM user_product WHERE user_product_id = ?1 RETURNING bill_id",
            )
            .bind(user_product_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// `filter` is one of the fixed predicates above, never user input.
    async fn fetch_ordered(&self, filter: &'static str, value: &str) -> DbResult<Vec<UserProduct>> {
        let sql = format!("{JOINED_SELECT} WHERE {filter} ORDER BY up.created_at, up.rowid");
        timed(
            self.query_timeout,
            sqlx::query_as::<_, UserProduct>(&sql)
                .bind(value)
                .fetch_all(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl UserProductStorer for UserProductRepository {
    async fn insert_user_product(
        &self,
        item: &NewUserProduct,
        user_id: &str,
    ) -> StorageResult<String> {
        Ok(self.insert_user_product(item, user_id).await?)
    }

    async fn user_product_by_id(
        &self,
        user_product_id: &str,
    ) -> StorageResult<Option<UserProduct>> {
        Ok(self.user_product_by_id(user_product_id).await?)
    }

    async fn user_products_by_bill_id(&self, bill_id: &str) -> StorageResult<Vec<UserProduct>> {
        Ok(UserProductRepository::user_products_by_bill_id(self, bill_id).await?)
    }

    async fn user_products_by_user_id(&self, user_id: &str) -> StorageResult<Vec<UserProduct>> {
        Ok(self.user_products_by_user_id(user_id).await?)
    }

    async fn recent_user_products_by_store(
        &self,
        user_id: &str,
        store_id: &str,
    ) -> StorageResult<Vec<UserProduct>> {
        Ok(self.recent_user_products_by_store(user_id, store_id).await?)
    }

    async fn update_quantity(&self, update: &QuantityUpdate) -> StorageResult<()> {
        Ok(self.update_quantity(update).await?)
    }

    async fn delete_user_product(&self, user_product_id: &str) -> StorageResult<Option<String>> {
        Ok(self.delete_user_product(user_product_id).await?)
    }
}

#[async_trait]
impl BillUserProductsStorer for UserProductRepository {
    async fn user_products_by_bill_id(&self, bill_id: &str) -> StorageResult<Vec<UserProduct>> {
        Ok(UserProductRepository::user_products_by_bill_id(self, bill_id).await?)
    }
}
