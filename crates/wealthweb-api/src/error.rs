//! Error types for wealthweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use wealthweb_core::{CoreError, ErrorSeverity};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound { resource: resource.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(error) => match error {
                CoreError::AccountNotFound { .. }
                | CoreError::TransactionNotFound { .. }
                | CoreError::GoalNotFound { .. }
                | CoreError::CategoryNotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CoreError::InvalidFormat { .. } | CoreError::ImportError(_) => StatusCode::BAD_REQUEST,
                CoreError::StorageError { .. } | CoreError::Serialization(_) | CoreError::IoError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

/// Shorthand for handler results
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Core(error) => {
                match error.severity() {
                    ErrorSeverity::Error | ErrorSeverity::Critical => {
                        log::error!(target: "wealthweb::api", "{}", error.to_details())
                    }
                    _ => log::debug!(target: "wealthweb::api", "{}", error),
                }
                serde_json::to_value(error.to_details()).unwrap_or_default()
            }
            ApiError::NotFound { .. } => serde_json::json!({
                "code": "NOT_FOUND",
                "message": self.to_string(),
            }),
            ApiError::BadRequest { .. } => serde_json::json!({
                "code": "BAD_REQUEST",
                "message": self.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
