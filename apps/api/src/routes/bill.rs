//! # Bill Routes
//!
//! ```text
//! POST /bill/start   {store_id}          ──► open bill (or the one already open)
//! POST /bill/stop    {bill_id, amount}   ──► create → complete
//! POST /bill/cancel  {bill_id}           ──► create → cancel
//! GET  /bill/get-last                    ──► open bill, 204 when none
//! GET  /bill/get-all                     ──► every bill, oldest first
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use shopagg_core::validation::{validate_amount, validate_uuid};
use shopagg_core::{Bill, BillView};

use super::{reply, Envelope};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bill/get-all", get(bills_by_user_id))
        .route("/bill/get-last", get(last_bill))
        .route("/bill/start", post(start))
        .route("/bill/stop", post(close))
        .route("/bill/cancel", post(cancel))
}

#[derive(Debug, Deserialize)]
pub struct StartBillRequest {
    pub store_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CloseBillRequest {
    pub bill_id: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelBillRequest {
    pub bill_id: String,
}

async fn start(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<StartBillRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<BillView>>> {
    let Json(body) = payload?;
    let store_id = validate_uuid("store_id", &body.store_id)?;

    let bill = state.bills.start_bill(&user_id, &store_id).await?;
    Ok(reply("bill started", bill))
}

async fn close(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CloseBillRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Json(body) = payload?;
    let bill_id = validate_uuid("bill_id", &body.bill_id)?;
    validate_amount("amount", &body.amount)?;

    state
        .bills
        .close_bill(&user_id, &bill_id, body.amount.trim())
        .await?;
    Ok(reply("bill close", ()))
}

async fn cancel(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CancelBillRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Json(body) = payload?;
    let bill_id = validate_uuid("bill_id", &body.bill_id)?;

    state.bills.cancel_bill(&user_id, &bill_id).await?;
    Ok(reply("bill canceled", ()))
}

async fn bills_by_user_id(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Envelope<Vec<Bill>>>> {
    let bills = state.bills.bills_by_user_id(&user_id).await?;
    Ok(reply("get bills", bills))
}

async fn last_bill(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Response> {
    match state.bills.last_bill(&user_id).await? {
        Some(bill) => Ok(reply("get last bill", bill).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
