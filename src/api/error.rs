//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::DictionaryError;

/// Axum-facing wrapper around [`DictionaryError`].
///
/// Every error body is `{"error": "<message>"}`.
#[derive(Debug)]
pub struct AppError(pub DictionaryError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DictionaryError::Validation(_) => StatusCode::BAD_REQUEST,
            DictionaryError::Unauthorized => StatusCode::UNAUTHORIZED,
            DictionaryError::AdminDisabled(_) => StatusCode::SERVICE_UNAVAILABLE,
            DictionaryError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<DictionaryError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl From<QueryRejection> for DictionaryError {
    fn from(rejection: QueryRejection) -> Self {
        DictionaryError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for DictionaryError {
    fn from(rejection: PathRejection) -> Self {
        DictionaryError::validation(rejection.body_text())
    }
}

impl From<JsonRejection> for DictionaryError {
    fn from(rejection: JsonRejection) -> Self {
        DictionaryError::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_status_codes() {
        let cases = [
            (DictionaryError::validation("q is required"), StatusCode::BAD_REQUEST),
            (DictionaryError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                DictionaryError::AdminDisabled("no secret".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (DictionaryError::not_found("Word not found"), StatusCode::NOT_FOUND),
            (
                DictionaryError::Config("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError(err).status(), status);
        }
    }
}
