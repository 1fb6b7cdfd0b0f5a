//! Brand lookup by name prefix and explicit brand creation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use shopagg_core::validation::validate_name;
use shopagg_core::Brand;

use super::{reply, Envelope};
use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/brand/get/{name}", get(by_partial_name))
        .route("/brand/create", post(create))
}

#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub brand_name: String,
}

async fn by_partial_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Envelope<Vec<Brand>>>> {
    let brands = state.brands.by_partial_name(&name).await?;
    Ok(reply("brands", brands))
}

async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateBrandRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<Brand>>> {
    let Json(body) = payload?;
    validate_name("brand_name", &body.brand_name)?;

    let brand = state.brands.create(body.brand_name.trim()).await?;
    Ok(reply("brand created", brand))
}
