//! # HTTP Error Mapping
//!
//! ```text
//! ┌───────────────────────────────────────────────┬────────┐
//! │ Error                                         │ Status │
//! ├───────────────────────────────────────────────┼────────┤
//! │ CoreError (business rule, storage, validation)│  400   │
//! │ Malformed JSON body or path                   │  400   │
//! │ Missing or unknown session token              │  401   │
//! │ CoreError::Canceled (storage deadline)        │  408   │
//! └───────────────────────────────────────────────┴────────┘
//! ```
//!
//! Every error body is `{"error": "<text>"}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shopagg_core::{CoreError, ValidationError};
use thiserror::Error;

/// Error type returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A use case refused the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    /// No valid session token on a protected route.
    #[error("unauthorized")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::Canceled) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Core(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Core(CoreError::Validation(error))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::REQUEST_TIMEOUT {
            tracing::warn!(error = %self, "Request canceled by storage deadline");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
