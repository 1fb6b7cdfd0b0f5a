//! # Session Token Middleware
//!
//! ```text
//! Authorization: <token>          (a "Bearer " prefix is accepted)
//!        │
//!        ▼
//! require_token ──► AuthService::authenticate ──► CurrentUser in extensions
//!        │                                              │
//!        └─ missing / unknown / inactive ──► 401        ▼
//!                                                  handler
//! ```

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use shopagg_core::CoreError;

use crate::error::ApiError;
use crate::AppState;

/// Id of the user owning the request's session token.
///
/// Only available on routes behind [`require_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Resolves the `Authorization` header to a user, or answers 401.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(bearer)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let user_id = state.auth.authenticate(&token).await.map_err(|e| match e {
        CoreError::Canceled => ApiError::Core(e),
        _ => ApiError::Unauthorized,
    })?;

    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

fn bearer(header: &str) -> &str {
    let header = header.trim();
    header.strip_prefix("Bearer ").unwrap_or(header).trim()
}
