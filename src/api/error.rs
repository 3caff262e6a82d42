//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::core::{Error, StoreError};

/// Result type returned by handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Whether the operation was successful (always false)
    pub success: bool,
    /// Error message
    pub error: String,
    /// Machine-stable reason
    pub reason: &'static str,
    /// Optional details about what was invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Handler error: a crate error rendered as a JSON response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl<E> From<E> for ApiError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    /// HTTP status for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Validation(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Storage(StoreError::InvalidCollection(_)) => StatusCode::BAD_REQUEST,
            Error::Storage(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) | Error::Config(_) | Error::Internal(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        let (message, details) = match &self.0 {
            Error::NotFound(msg) | Error::Unauthorized(msg) | Error::InvalidInput(msg) => {
                (msg.clone(), None)
            }
            Error::Validation(errors) => (
                "Validation failed".to_string(),
                serde_json::to_value(&errors.errors).ok(),
            ),
            other => (other.to_string(), None),
        };

        ErrorResponse {
            success: false,
            error: message,
            reason: self.0.reason(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else if status == StatusCode::UNAUTHORIZED {
            warn!("Unauthorized request: {}", self.0);
        } else {
            debug!("Request rejected: {}", self.0);
        }

        (status, Json(self.body())).into_response()
    }
}
