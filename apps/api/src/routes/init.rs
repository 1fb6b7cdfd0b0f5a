//! Liveness and the static catalogue clients load at start-up.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use shopagg_core::catalog::{app_initialisation, AppInitialisation};

use super::{reply, Envelope};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/init", get(init))
}

/// 200 while the database answers, 503 otherwise.
async fn health(State(state): State<AppState>) -> StatusCode {
    if state.db.health_check().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn init() -> Json<Envelope<AppInitialisation>> {
    reply("app initialisation", app_initialisation())
}
