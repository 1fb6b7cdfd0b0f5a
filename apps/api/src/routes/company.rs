use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shopagg_core::Company;

use super::{reply, Envelope};
use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/company/get/{name}", get(by_partial_name))
}

async fn by_partial_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Envelope<Vec<Company>>>> {
    let companies = state.companies.by_partial_name(&name).await?;
    Ok(reply("companies", companies))
}
