//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::{AccountsError, CatalogError};

/// API-level error type that maps to HTTP responses.
///
/// Every variant serializes as `{"error": message}` with the mapped status.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// Failure reported by the accounts collaborator; its status code is
    /// propagated verbatim.
    Collaborator { status: u16, message: String },
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Collaborator { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => ApiError::BadRequest(msg),
            CatalogError::ProductNotFound(_) => ApiError::NotFound(err.to_string()),
            CatalogError::Accounts(AccountsError::Upstream { status, message }) => {
                ApiError::Collaborator { status, message }
            }
            CatalogError::Accounts(err) => ApiError::Internal(err.to_string()),
        }
    }
}
