//! Handler-boundary error type rendered as the response envelope.
//!
//! Handlers convert every foreseeable failure into an [`ApiError`] carrying a
//! domain code and an explicit HTTP status; nothing propagates to the
//! framework's generic error path. Server-side failures are captured to
//! Sentry before responding.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::db::RepositoryError;
use crate::response::{Envelope, ResponseMeta};

/// A single field-level validation issue, reported in `error.details`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// An enveloped API error: domain code, message, explicit status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
    meta: Option<ResponseMeta>,
}

impl ApiError {
    /// 400 with a domain code.
    #[must_use]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// 401 with a domain code.
    #[must_use]
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    /// 403 with a domain code.
    #[must_use]
    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    /// 404 with a domain code.
    #[must_use]
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    /// 500 with a domain code.
    #[must_use]
    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    /// 400 `VALIDATION_ERROR` carrying field issues in `error.details`.
    #[must_use]
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        let details = serde_json::to_value(&issues).ok();
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: "Request validation failed".to_string(),
            details,
            meta: None,
        }
    }

    /// Map a repository failure to a domain code.
    ///
    /// The underlying database error is logged but never exposed to clients.
    #[must_use]
    pub fn database(code: &'static str, err: &RepositoryError, status: StatusCode) -> Self {
        tracing::error!(error = %err, code, "repository operation failed");
        let message = match err {
            RepositoryError::NotFound => "Record not found".to_string(),
            RepositoryError::Conflict(msg) => msg.clone(),
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                "Database operation failed".to_string()
            }
        };
        Self::new(status, code, message)
    }

    /// Attach the per-request envelope context.
    #[must_use]
    pub fn with_meta(mut self, meta: &ResponseMeta) -> Self {
        self.meta = Some(meta.clone());
        self
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The domain code this error renders with.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
            meta: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let meta = self.meta.unwrap_or_else(|| ResponseMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            request_id: None,
        });

        Envelope::<()>::fail_with_details(
            self.code,
            self.message,
            self.details,
            &meta,
            self.status,
        )
        .into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ApiError::not_found("NOT_FOUND", "Product not found");
        assert_eq!(err.to_string(), "NOT_FOUND: Product not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::bad_request("ADDRESS_EXISTS", "dup").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("UNAUTHORIZED", "missing token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("NOT_A_SELLER", "not a seller").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::internal("UPLOAD_FAILED", "boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_collects_details() {
        let err = ApiError::validation(vec![
            ValidationIssue::new("title", "must be at least 3 characters"),
            ValidationIssue::new("price_iqd", "must be positive"),
        ]);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let details = err.details.expect("details");
        assert_eq!(details[0]["field"], "title");
        assert_eq!(details[1]["field"], "price_iqd");
    }

    #[test]
    fn test_database_error_hides_internals() {
        let repo_err = RepositoryError::DataCorruption("invalid phone in database".to_string());
        let err = ApiError::database("FETCH_PRODUCTS_FAILED", &repo_err, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Database operation failed");
    }
}
