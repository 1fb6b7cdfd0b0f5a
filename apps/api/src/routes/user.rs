//! # Account Routes
//!
//! Registration and login are public; everything under `/user` needs a
//! session token.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shopagg_core::validation::{validate_email, validate_name, validate_required};
use shopagg_core::User;

use super::{reply, Envelope};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/create-user", post(create_user))
        .route("/login", post(login))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/get", get(get_user))
        .route("/user/logout", post(logout))
        .route("/user/reset-password", post(update_password))
        .route("/user/update-email", post(update_email))
}

// =============================================================================
// Requests & Responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub login: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

// =============================================================================
// Handlers
// =============================================================================

async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<User>>> {
    let Json(body) = payload?;
    validate_name("login", &body.login)?;
    validate_email(&body.email)?;
    validate_required("password", &body.password)?;

    let user = state
        .users
        .create_user(body.login.trim(), body.email.trim(), &body.password)
        .await?;
    Ok(reply("User created", user))
}

/// Answers `{"token": ...}` without the envelope.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(body) = payload?;
    validate_required("login", &body.login)?;
    validate_required("password", &body.password)?;

    let token = state.auth.login(body.login.trim(), &body.password).await?;
    Ok(Json(LoginResponse { token }))
}

async fn logout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Envelope<()>>> {
    state.auth.logout(&user_id).await?;
    Ok(reply("Logout successful", ()))
}

async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Envelope<User>>> {
    let user = state.users.user_by_id(&user_id).await?;
    Ok(reply("get user", user))
}

async fn update_password(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Json(body) = payload?;
    validate_required("old_password", &body.old_password)?;
    validate_required("password", &body.password)?;

    state
        .users
        .update_password(&user_id, &body.old_password, &body.password)
        .await?;
    Ok(reply("password updated", ()))
}

async fn update_email(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<UpdateEmailRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Json(body) = payload?;
    validate_email(&body.email)?;

    state.users.update_email(&user_id, body.email.trim()).await?;
    Ok(reply("email updated", ()))
}
