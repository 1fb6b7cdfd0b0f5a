//! # Authentication
//!
//! Login exchanges credentials for an opaque token; every protected request
//! resolves its token back to a user id.
//!
//! ```text
//! login(login, password)
//!    ├── user by login ──► none ──► UserNotFound
//!    ├── verify argon2 hash ──► mismatch ──► PasswordError
//!    └── new token ──► upsert as the user's single active token
//!
//! authenticate(token) ──► active token row ──► user_id
//! logout(user_id)     ──► token deactivated
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{CoreError, CoreResult, User};
use tracing::{debug, info};

use crate::credentials::{generate_token, verify_password};
use crate::storage::{fail, StorageResult};

#[async_trait]
pub trait AuthUserStorer: Send + Sync {
    async fn user_by_login(&self, login: &str) -> StorageResult<Option<User>>;
}

#[async_trait]
pub trait AuthStorer: Send + Sync {
    /// Stores `token` as the only active token of `user_id`.
    async fn upsert_token(&self, user_id: &str, token: &str) -> StorageResult<()>;

    async fn deactivate_token(&self, user_id: &str) -> StorageResult<()>;

    /// Owner of `token` if it is active.
    async fn user_id_by_token(&self, token: &str) -> StorageResult<Option<String>>;
}

#[derive(Clone)]
pub struct AuthService {
    tokens: Arc<dyn AuthStorer>,
    users: Arc<dyn AuthUserStorer>,
}

impl AuthService {
    pub fn new(tokens: Arc<dyn AuthStorer>, users: Arc<dyn AuthUserStorer>) -> Self {
        AuthService { tokens, users }
    }

    /// Verifies credentials and issues a fresh token, replacing any previous one.
    pub async fn login(&self, login: &str, password: &str) -> CoreResult<String> {
        let user = self
            .users
            .user_by_login(login)
            .await
            .map_err(fail("login: user lookup", CoreError::UserError))?
            .ok_or(CoreError::UserNotFound)?;

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = %user.user_id, "Password mismatch");
            return Err(CoreError::PasswordError);
        }

        let token = generate_token();
        self.tokens
            .upsert_token(&user.user_id, &token)
            .await
            .map_err(fail("login: token upsert", CoreError::UserError))?;

        info!(user_id = %user.user_id, "User logged in");
        Ok(token)
    }

    pub async fn logout(&self, user_id: &str) -> CoreResult<()> {
        self.tokens
            .deactivate_token(user_id)
            .await
            .map_err(fail("logout", CoreError::UserNotFound))?;

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Resolves an active token to its user id.
    ///
    /// ## Errors
    /// [`CoreError::UserNotFound`] for unknown or deactivated tokens.
    pub async fn authenticate(&self, token: &str) -> CoreResult<String> {
        self.tokens
            .user_id_by_token(token)
            .await
            .map_err(fail("authenticate", CoreError::UserError))?
            .ok_or(CoreError::UserNotFound)
    }
}
