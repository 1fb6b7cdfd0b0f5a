//! # Auth Repository
//!
//! One token row per user. Login replaces the token and reactivates the
//! row; logout only flips `is_active`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shopagg_service::{AuthStorer, StorageResult};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::pool::timed;

#[derive(Debug, Clone)]
pub struct AuthRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl AuthRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        AuthRepository { pool, query_timeout }
    }

    pub async fn upsert_token(&self, user_id: &str, token: &str) -> DbResult<()> {
        debug!(user_id = %user_id, "Storing token");

        timed(
            self.query_timeout,
            sqlx::query(
                r#"
                INSERT INTO auth (user_id, token, is_active, updated_at)
                VALUES (?1, ?2, 1, ?3)
                ON CONFLICT(user_id) DO UPDATE SET
                    token = excluded.token,
                    is_active = 1,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(user_id)
            .bind(token)
            .bind(Utc::now())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    pub async fn deactivate_token(&self, user_id: &str) -> DbResult<()> {
        timed(
            self.query_timeout,
            sqlx::query("UPDATE auth SET is_active = 0, updated_at = ?1 WHERE user_id = ?2")
                .bind(Utc::now())
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    /// Owner of an active token whose user still exists.
    pub async fn user_id_by_token(&self, token: &str) -> DbResult<Option<String>> {
        timed(
            self.query_timeout,
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT u.user_id
                FROM users u
                INNER JOIN auth a ON a.user_id = u.user_id
                WHERE a.token = ?1 AND a.is_active = 1
                "#,
            )
            .bind(token)
            .fetch_optional(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl AuthStorer for AuthRepository {
    async fn upsert_token(&self, user_id: &str, token: &str) -> StorageResult<()> {
        Ok(self.upsert_token(user_id, token).await?)
    }

    async fn deactivate_token(&self, user_id: &str) -> StorageResult<()> {
        Ok(self.deactivate_token(user_id).await?)
    }

    async fn user_id_by_token(&self, token: &str) -> StorageResult<Option<String>> {
        Ok(self.user_id_by_token(token).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing;

    #[tokio::test]
    async fn test_token_lifecycle() {
        let db = testing::database().await;
        let alice = testing::user(&db, "alice").await;
        let auth = db.auth();

        auth.upsert_token(&alice.user_id, "t1").await.unwrap();
        assert_eq!(auth.user_id_by_token("t1").await.unwrap(), Some(alice.user_id.clone()));

        auth.upsert_token(&alice.user_id, "t2").await.unwrap();
        assert!(auth.user_id_by_token("t1").await.unwrap().is_none());
        assert_eq!(auth.user_id_by_token("t2").await.unwrap(), Some(alice.user_id.clone()));

        auth.deactivate_token(&alice.user_id).await.unwrap();
        assert!(auth.user_id_by_token("t2").await.unwrap().is_none());

        // A new login reactivates the row.
        auth.upsert_token(&alice.user_id, "t3").await.unwrap();
        assert_eq!(auth.user_id_by_token("t3").await.unwrap(), Some(alice.user_id));
    }
}
