//! Barcoded products, keyed by EAN.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use shopagg_core::validation::{validate_name, validate_required};
use shopagg_core::{CoreError, Product};

use super::{reply, Envelope};
use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/product/get/{ean}", get(by_ean))
        .route("/product/create-product", post(create))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub ean: String,
    pub product_name: String,
    pub brand_name: String,
}

/// Creating a product with a known EAN returns the stored product.
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<Product>>> {
    let Json(body) = payload?;
    validate_required("ean", &body.ean)?;
    validate_name("product_name", &body.product_name)?;
    validate_name("brand_name", &body.brand_name)?;

    let product = Product {
        product_id: String::new(),
        ean: body.ean.trim().to_string(),
        product_name: body.product_name.trim().to_string(),
        brand_id: String::new(),
    };
    let product = state
        .products
        .create(&product, body.brand_name.trim())
        .await?;
    Ok(reply("product created", product))
}

/// 204 when no product carries the EAN.
async fn by_ean(State(state): State<AppState>, Path(ean): Path<String>) -> ApiResult<Response> {
    match state.products.product_by_ean(&ean).await {
        Ok(product) => Ok(reply("product", product).into_response()),
        Err(CoreError::NotExistsError) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => Err(e.into()),
    }
}
