//! # Bill Repository
//!
//! ## One Open Bill Per User
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  idx_bill_one_open_per_user: UNIQUE (user_id) WHERE bill_state='create' │
//! │                                                                         │
//! │  request A ── INSERT ... ON CONFLICT DO UPDATE ... RETURNING ──► B1    │
//! │  request B ── INSERT ... ON CONFLICT DO UPDATE ... RETURNING ──► B1    │
//! │                                                                         │
//! │  Both concurrent starts get the same open bill.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shopagg_core::{Bill, BillState};
use shopagg_service::{BillStorer, StorageResult};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::timed;

#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl BillRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        BillRepository { pool, query_timeout }
    }

    /// Inserts an open bill, or returns the user's open bill if there is one.
    pub async fn insert_bill(&self, bill: &Bill) -> DbResult<Bill> {
        debug!(user_id = %bill.user_id, store_id = %bill.store_id, "Inserting bill");

        timed(
            self.query_timeout,
            sqlx::query_as::<_, Bill>(
                r#"
                INSERT INTO bill (bill_id, user_id, store_id, amount, bill_state, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(user_id) WHERE bill_state = 'create'
                DO UPDATE SET user_id = excluded.user_id
                RETURNING bill_id, user_id, store_id, amount, bill_state AS state
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&bill.user_id)
            .bind(&bill.store_id)
            .bind(&bill.amount)
            .bind(bill.state)
            .bind(Utc::now())
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn update_bill(&self, bill: &Bill) -> DbResult<()> {
        debug!(bill_id = %bill.bill_id, state = %bill.state, "Updating bill");

        timed(
            self.query_timeout,
            sqlx::query("UPDATE bill SET amount = ?1, bill_state = ?2 WHERE bill_id = ?3")
                .bind(&bill.amount)
                .bind(bill.state)
                .bind(&bill.bill_id)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    /// All bills of the user, oldest first.
    pub async fn bills_by_user_id(&self, user_id: &str) -> DbResult<Vec<Bill>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Bill>(
                r#"
                SELECT bill_id, user_id, store_id, amount, bill_state AS state
                FROM bill
                WHERE user_id = ?1
                ORDER BY created_at, rowid
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn unclosed_bill(&self, user_id: &str) -> DbResult<Option<Bill>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Bill>(
                r#"
                SELECT bill_id, user_id, store_id, amount, bill_state AS state
                FROM bill
                WHERE user_id = ?1 AND bill_state = ?2
                "#,
            )
            .bind(user_id)
            .bind(BillState::Create)
            .fetch_optional(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl BillStorer for BillRepository {
    async fn insert_bill(&self, bill: &Bill) -> StorageResult<Bill> {
        Ok(self.insert_bill(bill).await?)
    }

    async fn update_bill(&self, bill: &Bill) -> StorageResult<()> {
        Ok(self.update_bill(bill).await?)
    }

    async fn bills_by_user_id(&self, user_id: &str) -> StorageResult<Vec<Bill>> {
        Ok(self.bills_by_user_id(user_id).await?)
    }

    async fn unclosed_bill(&self, user_id: &str) -> StorageResult<Option<Bill>> {
        Ok(self.unclosed_bill(user_id).await?)
    }
}
