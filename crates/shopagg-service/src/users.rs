//! # Accounts
//!
//! Registration and profile changes. Passwords only ever reach storage as
//! argon2 hashes.

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{CoreError, CoreResult, User};
use tracing::{error, info};

use crate::credentials::{hash_password, verify_password};
use crate::storage::{fail, StorageResult};

#[async_trait]
pub trait UsersStorer: Send + Sync {
    /// Inserts the user, or updates the email of the user with the same login.
    async fn upsert_user(&self, user: &User) -> StorageResult<()>;

    async fn user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    async fn user_by_login(&self, login: &str) -> StorageResult<Option<User>>;

    async fn user_by_id(&self, user_id: &str) -> StorageResult<Option<User>>;

    async fn update_password(&self, user_id: &str, password_hash: &str) -> StorageResult<()>;

    async fn update_email(&self, user_id: &str, email: &str) -> StorageResult<()>;
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UsersStorer>,
}

impl UserService {
    pub fn new(users: Arc<dyn UsersStorer>) -> Self {
        UserService { users }
    }

    /// Registers a new account.
    ///
    /// ## Errors
    /// [`CoreError::EmailTaken`] / [`CoreError::LoginTaken`] when either is
    /// already registered.
    pub async fn create_user(&self, login: &str, email: &str, password: &str) -> CoreResult<User> {
        let by_email = self
            .users
            .user_by_email(email)
            .await
            .map_err(fail("create_user: email lookup", CoreError::UserError))?;
        if by_email.is_some() {
            return Err(CoreError::EmailTaken(email.to_string()));
        }

        let by_login = self
            .users
            .user_by_login(login)
            .await
            .map_err(fail("create_user: login lookup", CoreError::UserError))?;
        if by_login.is_some() {
            return Err(CoreError::LoginTaken(login.to_string()));
        }

        let user = User {
            user_id: String::new(),
            login: login.to_string(),
            email: email.to_string(),
            password_hash: hash(password)?,
        };

        self.users
            .upsert_user(&user)
            .await
            .map_err(fail("create_user: upsert", CoreError::UserError))?;

        let created = self
            .users
            .user_by_login(login)
            .await
            .map_err(fail("create_user: re-fetch", CoreError::UserError))?
            .ok_or(CoreError::UserError)?;

        info!(user_id = %created.user_id, login = %login, "User created");
        Ok(created)
    }

    /// Replaces the password after checking the current one.
    pub async fn update_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> CoreResult<()> {
        let user = self.user_by_id(user_id).await?;

        if !verify_password(old_password, &user.password_hash) {
            return Err(CoreError::OldPasswordError);
        }

        self.users
            .update_password(user_id, &hash(new_password)?)
            .await
            .map_err(fail("update_password", CoreError::UserError))?;

        info!(user_id = %user_id, "Password updated");
        Ok(())
    }

    pub async fn update_email(&self, user_id: &str, email: &str) -> CoreResult<()> {
        self.user_by_id(user_id).await?;

        let owner = self
            .users
            .user_by_email(email)
            .await
            .map_err(fail("update_email: email lookup", CoreError::UserError))?;
        if owner.is_some_and(|u| u.user_id != user_id) {
            return Err(CoreError::EmailTaken(email.to_string()));
        }

        self.users
            .update_email(user_id, email)
            .await
            .map_err(fail("update_email", CoreError::UserError))?;

        info!(user_id = %user_id, "Email updated");
        Ok(())
    }

    pub async fn user_by_id(&self, user_id: &str) -> CoreResult<User> {
        self.users
            .user_by_id(user_id)
            .await
            .map_err(fail("user_by_id", CoreError::UserError))?
            .ok_or(CoreError::UserNotFound)
    }
}

fn hash(password: &str) -> CoreResult<String> {
    hash_password(password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        CoreError::PasswordError
    })
}
