//! # Store Routes
//!
//! Store registration goes through find-or-create: the company is resolved
//! by name and an existing store at the same location is returned instead
//! of a duplicate.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use shopagg_core::validation::{normalize_new_store, validate_name};
use shopagg_core::{NewStore, Store, StoreType};

use super::{reply, Envelope};
use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/store/get/{store_type}/{search}", get(by_zip_code_or_name))
        .route("/store/create-store", post(create_store))
}

#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub company_name: String,
    #[serde(flatten)]
    pub store: NewStore,
}

async fn create_store(
    State(state): State<AppState>,
    payload: Result<Json<CreateStoreRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<Store>>> {
    let Json(body) = payload?;
    validate_name("company_name", &body.company_name)?;
    let store = normalize_new_store(body.store)?;

    let store = state
        .stores
        .create_store(store, body.company_name.trim())
        .await?;
    Ok(reply("store created", store))
}

/// Shops match on zip-code prefix, web stores on a name substring.
async fn by_zip_code_or_name(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<Envelope<Vec<Store>>>> {
    let Path((store_type, search)) = path?;
    let store_type: StoreType = store_type.parse()?;

    let stores = state
        .stores
        .stores_by_zip_code_or_name(store_type, &search)
        .await?;
    Ok(reply("stores", stores))
}
