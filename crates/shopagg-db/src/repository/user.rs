//! # User Repository
//!
//! Accounts. Login and email are unique; registering an existing login
//! updates its email instead of failing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shopagg_core::User;
use shopagg_service::{AuthUserStorer, StorageResult, UsersStorer};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::timed;

const USER_COLUMNS: &str = "SELECT user_id, login, email, password AS password_hash FROM users";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl UserRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        UserRepository { pool, query_timeout }
    }

    /// Inserts `user` (a fresh id is generated when empty), or updates the
    /// email of the row with the same login.
    pub async fn upsert_user(&self, user: &User) -> DbResult<()> {
        let user_id = if user.user_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            user.user_id.clone()
        };

        debug!(login = %user.login, "Upserting user");

        timed(
            self.query_timeout,
            sqlx::query(
                r#"
                INSERT INTO users (user_id, login, email, password, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(login) DO UPDATE SET email = excluded.email
                "#,
            )
            .bind(&user_id)
            .bind(&user.login)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(Utc::now())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    pub async fn user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.fetch_one_where("email", email).await
    }

    pub async fn user_by_login(&self, login: &str) -> DbResult<Option<User>> {
        self.fetch_one_where("login", login).await
    }

    pub async fn user_by_id(&self, user_id: &str) -> DbResult<Option<User>> {
        self.fetch_one_where("user_id", user_id).await
    }

    pub async fn update_password(&self, user_id: &str, password_hash: &str) -> DbResult<()> {
        timed(
            self.query_timeout,
            sqlx::query("UPDATE users SET password = ?1 WHERE user_id = ?2")
                .bind(password_hash)
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    pub async fn update_email(&self, user_id: &str, email: &str) -> DbResult<()> {
        timed(
            self.query_timeout,
            sqlx::query("UPDATE users SET email = ?1 WHERE user_id = ?2")
                .bind(email)
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    /// `column` is always one of the literals above, never user input.
    async fn fetch_one_where(&self, column: &'static str, value: &str) -> DbResult<Option<User>> {
        let sql = format!("{USER_COLUMNS} WHERE {column} = ?1");
        timed(
            self.query_timeout,
            sqlx::query_as::<_, User>(&sql)
                .bind(value)
                .fetch_optional(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl UsersStorer for UserRepository {
    async fn upsert_user(&self, user: &User) -> StorageResult<()> {
        Ok(self.upsert_user(user).await?)
    }

    async fn user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self.user_by_email(email).await?)
    }

    async fn user_by_login(&self, login: &str) -> StorageResult<Option<User>> {
        Ok(self.user_by_login(login).await?)
    }

    async fn user_by_id(&self, user_id: &str) -> StorageResult<Option<User>> {
        Ok(self.user_by_id(user_id).await?)
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> StorageResult<()> {
        Ok(self.update_password(user_id, password_hash).await?)
    }

    async fn update_email(&self, user_id: &str, email: &str) -> StorageResult<()> {
        Ok(self.update_email(user_id, email).await?)
    }
}

#[async_trait]
impl AuthUserStorer for UserRepository {
    async fn user_by_login(&self, login: &str) -> StorageResult<Option<User>> {
        Ok(UserRepository::user_by_login(self, login).await?)
    }
}
