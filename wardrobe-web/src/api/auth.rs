//! Bearer token authentication middleware
//!
//! Applied to the protected `/api` routes only. Resolves the token to a
//! user and stores it as a request extension for handlers.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::db::users::{self, User};
use crate::error::ApiError;
use crate::AppState;

/// The authenticated user for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Reject requests without a valid bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?
        .to_string();

    let user = users::find_by_token(&state.db, &token)
        .await?
        .ok_or_else(|| {
            debug!("Rejected unknown bearer token");
            ApiError::Unauthorized("Unknown or expired token".to_string())
        })?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
