//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use pizzeria_storage::StorageError;
use serde_json::json;

/// Errors returned by the API handlers
///
/// The body shape differs per variant: lookups by path report a single
/// `error` string, while the create endpoint always reports an `errors`
/// list.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A path id did not resolve; `{"error": "..."}` with 404
    #[error("{0}")]
    NotFound(String),

    /// A referenced id in a request body did not resolve; `{"errors": [...]}` with 404
    #[error("{0}")]
    MissingReference(String),

    /// Rejected input or rejected write; `{"errors": [...]}` with 422
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    /// Anything else; `{"error": "..."}` with 500
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::MissingReference(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        tracing::error!("Storage failure: {}", e);
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::NotFound(message) | Self::Internal(message) => json!({ "error": message }),
            Self::MissingReference(message) => json!({ "errors": [message] }),
            Self::Validation(messages) => json!({ "errors": messages }),
        };

        (status, Json(body)).into_response()
    }
}
