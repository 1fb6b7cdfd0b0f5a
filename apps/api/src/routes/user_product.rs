//! # Line Item Routes
//!
//! Mutations answer with the refreshed item list of the affected bill, in
//! creation order, so clients redraw the bill from one response.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use shopagg_core::validation::{validate_amount, validate_quantity, validate_uuid};
use shopagg_core::{NewUserProduct, QuantityUpdate, UserProduct};

use super::{reply, Envelope};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user-product/get-bill-id/{bill_id}", get(products_by_bill))
        .route("/user-product/get-all", get(products_by_user))
        .route("/user-product/recent/{store_id}", get(recent_by_store))
        .route("/user-product/create-user-product", post(create))
        .route("/user-product/quantity", put(update_quantity))
        .route("/user-product/delete/{user_product_id}", delete(remove))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<NewUserProduct>, JsonRejection>,
) -> ApiResult<Json<Envelope<UserProduct>>> {
    let Json(mut item) = payload?;
    item.product_id = validate_uuid("product_id", &item.product_id)?;
    item.bill_id = validate_uuid("bill_id", &item.bill_id)?;
    validate_amount("price", &item.price)?;
    validate_quantity(item.quantity)?;
    item.price = item.price.trim().to_string();

    let created = state.user_products.create(&item, &user_id).await?;
    Ok(reply("user product created", created))
}

async fn products_by_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<UserProduct>>>> {
    let bill_id = validate_uuid("bill_id", &bill_id)?;
    let items = state.user_products.products_by_bill(&bill_id).await?;
    Ok(reply("user products", items))
}

async fn products_by_user(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Envelope<Vec<UserProduct>>>> {
    let items = state.user_products.products_by_user(&user_id).await?;
    Ok(reply("user products", items))
}

/// Latest line item per product the user bought at the store.
async fn recent_by_store(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(store_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<UserProduct>>>> {
    let store_id = validate_uuid("store_id", &store_id)?;
    let items = state
        .user_products
        .recent_products_by_store(&user_id, &store_id)
        .await?;
    Ok(reply("recent user products", items))
}

/// Acts on any line item by id; the caller only needs a valid token, not
/// ownership of the item.
async fn update_quantity(
    State(state): State<AppState>,
    payload: Result<Json<QuantityUpdate>, JsonRejection>,
) -> ApiResult<Json<Envelope<Vec<UserProduct>>>> {
    let Json(mut update) = payload?;
    update.bill_id = validate_uuid("bill_id", &update.bill_id)?;
    update.user_product_id = validate_uuid("user_product_id", &update.user_product_id)?;
    validate_quantity(update.quantity)?;

    let items = state.user_products.update_quantity(&update).await?;
    Ok(reply("user products", items))
}

/// Like [`update_quantity`], no ownership check on the item.
async fn remove(
    State(state): State<AppState>,
    Path(user_product_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<UserProduct>>>> {
    let user_product_id = validate_uuid("user_product_id", &user_product_id)?;
    let items = state
        .user_products
        .delete_user_product(&user_product_id)
        .await?;
    Ok(reply("user products", items))
}
