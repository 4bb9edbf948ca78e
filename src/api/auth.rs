//! Shared-secret guard for administrative routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::error::AppError;
use super::AppState;
use crate::error::DictionaryError;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Rejects the request unless `X-Admin-Secret` matches the configured secret.
///
/// With no secret configured every admin route answers 503.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_secret.as_deref() else {
        return Err(DictionaryError::AdminDisabled(
            "CLAUSON_ADMIN_SECRET is not configured".to_string(),
        )
        .into());
    };

    let provided = request
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !secrets_match(provided.as_bytes(), expected.as_bytes()) {
        warn!(path = %request.uri().path(), "Rejected admin request");
        return Err(DictionaryError::Unauthorized.into());
    }

    Ok(next.run(request).await)
}

/// Comparison time depends only on the lengths.
fn secrets_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
