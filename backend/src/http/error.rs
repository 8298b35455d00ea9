//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
#[cfg(test)]
use crate::db::repository::ErrorContext;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found, or a listing that matched nothing
    NotFound(String),
    /// Request body or path failed shape validation
    Unprocessable(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    /// Status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Repository(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Repository(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", msg),
            AppError::Unprocessable(msg) => ApiError::new("UNPROCESSABLE_ENTITY", msg),
            AppError::Repository(e) => {
                let code = match status {
                    StatusCode::NOT_FOUND => "NOT_FOUND",
                    StatusCode::SERVICE_UNAVAILABLE => "STORAGE_UNAVAILABLE",
                    _ => "REPOSITORY_ERROR",
                };
                if status.is_server_error() {
                    tracing::error!(error = %e, "repository error");
                }
                let body = ApiError::new(code, e.message());
                if e.context().is_empty() {
                    body
                } else {
                    body.with_details(e.context().to_string())
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Unprocessable(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("Todo not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unprocessable("missing field".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(RepositoryError::connection("refused")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(RepositoryError::not_found("gone")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::query("bad sql")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_repository_context_goes_to_details() {
        let err = RepositoryError::query("deadlock detected").with_context(
            ErrorContext::new("toggle_complete")
                .with_entity("todo")
                .with_entity_id(4),
        );
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "REPOSITORY_ERROR");
        assert_eq!(body.message, "deadlock detected");
        assert_eq!(
            body.details.as_deref(),
            Some("[operation=toggle_complete, entity=todo, id=4]")
        );
    }

    #[test]
    fn test_api_error_omits_missing_details() {
        let json = serde_json::to_value(ApiError::new("NOT_FOUND", "Todo not found")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Todo not found");
        assert!(json.get("details").is_none());

        let json = serde_json::to_value(ApiError::new("X", "y").with_details("z")).unwrap();
        assert_eq!(json["details"], "z");
    }
}
