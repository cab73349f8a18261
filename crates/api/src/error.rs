//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Every error body is JSON with an `error` field; validation failures add a
//! `details` list.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use section_factory_core::{FieldError, ValidationError};

use crate::db::RepositoryError;
use crate::seed::SeedError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request payload failed field validation.
    #[error("{message}: {source}")]
    Validation {
        /// Client-facing summary.
        message: &'static str,
        source: ValidationError,
    },

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Reloading the catalog failed.
    #[error("Seeding failed: {0}")]
    Seed(#[from] SeedError),
}

impl AppError {
    /// Wrap a validation failure with a client-facing summary.
    #[must_use]
    pub const fn invalid(message: &'static str, source: ValidationError) -> Self {
        Self::Validation { message, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Seed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let body = match self {
            Self::Database(RepositoryError::NotFound) => ErrorBody {
                error: "Not found".to_owned(),
                details: None,
            },
            Self::Database(RepositoryError::Conflict(msg)) => ErrorBody {
                error: msg,
                details: None,
            },
            Self::Database(_) => ErrorBody {
                error: "Internal server error".to_owned(),
                details: None,
            },
            Self::Seed(_) => ErrorBody {
                error: "Failed to seed database".to_owned(),
                details: None,
            },
            Self::Validation { message, source } => ErrorBody {
                error: message.to_owned(),
                details: Some(source.into_details()),
            },
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Section not found".to_string());
        assert_eq!(err.to_string(), "Section not found");

        let err = AppError::BadRequest("Shop domain is required".to_string());
        assert_eq!(err.to_string(), "Shop domain is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::MethodNotAllowed),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict("dup".into()))),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = body_json(AppError::Database(RepositoryError::DataCorruption(
            "bad price in row 7".to_owned(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_seed_failure_body() {
        let err = SeedError::Store(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        let (status, body) = body_json(AppError::from(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to seed database" }));
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let source = ValidationError::new(vec![
            FieldError::new("name", "is required"),
            FieldError::new("price", "must not be negative"),
        ]);
        let (status, body) = body_json(AppError::invalid("Invalid section data", source)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid section data");
        assert_eq!(body["details"][0]["field"], "name");
        assert_eq!(body["details"][1]["message"], "must not be negative");
    }
}
