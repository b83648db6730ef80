//! The uniform response envelope returned by every endpoint.
//!
//! Every handler result is wrapped into `{ data, error, meta, statusCode }`.
//! Exactly one of `data`/`error` is non-null, and `statusCode` is always set
//! explicitly by the caller - the envelope never infers a status from the
//! error it carries.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;
use crate::state::AppState;

/// Per-request envelope context: application version plus correlation id.
///
/// Extracted from the request so handlers can stamp `meta` without reaching
/// into ambient state.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Application version reported in `meta.version`
    pub version: String,
    /// Correlation id set by the request-id middleware
    pub request_id: Option<String>,
}

impl FromRequestParts<AppState> for ResponseMeta {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let request_id = parts.extensions.get::<RequestId>().map(|id| id.0.clone());

        Ok(Self {
            version: state.config().app_version.clone(),
            request_id,
        })
    }
}

/// Error descriptor carried by a failed envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Domain error code, e.g. `INVALID_OTP`
    pub code: String,
    /// Optional structured detail (validation issues etc.)
    pub details: Option<serde_json::Value>,
}

/// Envelope metadata block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
}

/// The uniform response wrapper.
///
/// Construct through [`Envelope::ok`], [`Envelope::created`],
/// [`Envelope::with_status`], or [`Envelope::fail`]; the constructors
/// guarantee that exactly one of `data`/`error` is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    data: Option<T>,
    error: Option<ErrorBody>,
    meta: Meta,
    status_code: u16,
}

impl<T> Envelope<T> {
    /// Wrap a successful result with status 200.
    #[must_use]
    pub fn ok(data: T, meta: &ResponseMeta) -> Self {
        Self::with_status(data, meta, StatusCode::OK)
    }

    /// Wrap a successful result with status 201.
    #[must_use]
    pub fn created(data: T, meta: &ResponseMeta) -> Self {
        Self::with_status(data, meta, StatusCode::CREATED)
    }

    /// Wrap a successful result with an explicit status code.
    #[must_use]
    pub fn with_status(data: T, meta: &ResponseMeta, status: StatusCode) -> Self {
        Self {
            data: Some(data),
            error: None,
            meta: build_meta(meta),
            status_code: status.as_u16(),
        }
    }

    /// Wrap an error descriptor with an explicit status code.
    ///
    /// The status is never inferred from the error - callers always pass it.
    #[must_use]
    pub fn fail(
        code: impl Into<String>,
        message: impl Into<String>,
        meta: &ResponseMeta,
        status: StatusCode,
    ) -> Self {
        Self::fail_with_details(code, message, None, meta, status)
    }

    /// Wrap an error descriptor carrying structured details.
    #[must_use]
    pub fn fail_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
        meta: &ResponseMeta,
        status: StatusCode,
    ) -> Self {
        Self {
            data: None,
            error: Some(ErrorBody {
                message: message.into(),
                code: code.into(),
                details,
            }),
            meta: build_meta(meta),
            status_code: status.as_u16(),
        }
    }

    /// The successful payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The error descriptor, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorBody> {
        self.error.as_ref()
    }

    /// The HTTP status code carried by the envelope.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }
}

fn build_meta(meta: &ResponseMeta) -> Meta {
    Meta {
        version: meta.version.clone(),
        timestamp: Utc::now(),
        request_id: meta.request_id.clone(),
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_meta() -> ResponseMeta {
        ResponseMeta {
            version: "0.1.0".to_string(),
            request_id: Some("req-123".to_string()),
        }
    }

    #[test]
    fn test_ok_carries_data_only() {
        let envelope = Envelope::ok(42, &test_meta());
        assert_eq!(envelope.data(), Some(&42));
        assert!(envelope.error().is_none());
        assert_eq!(envelope.status_code(), 200);
    }

    #[test]
    fn test_fail_carries_error_only() {
        let envelope: Envelope<()> = Envelope::fail(
            "INVALID_OTP",
            "Invalid or expired verification code",
            &test_meta(),
            StatusCode::UNAUTHORIZED,
        );
        assert!(envelope.data().is_none());
        let error = envelope.error().expect("error body");
        assert_eq!(error.code, "INVALID_OTP");
        assert_eq!(envelope.status_code(), 401);
    }

    #[test]
    fn test_status_is_never_inferred_from_error() {
        // A caller may envelope an error with a 2xx status; the builder
        // must take it at face value.
        let envelope: Envelope<()> =
            Envelope::fail("SOFT_FAIL", "ignored upstream", &test_meta(), StatusCode::OK);
        assert_eq!(envelope.status_code(), 200);
    }

    #[test]
    fn test_wire_shape() {
        let envelope = Envelope::created(serde_json::json!({"id": 1}), &test_meta());
        let value = serde_json::to_value(&envelope).expect("serializes");

        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["error"], serde_json::Value::Null);
        assert_eq!(value["data"]["id"], 1);
        assert_eq!(value["meta"]["version"], "0.1.0");
        assert_eq!(value["meta"]["requestId"], "req-123");
        assert!(value["meta"]["timestamp"].is_string());
    }

    #[test]
    fn test_missing_request_id_serializes_null() {
        let meta = ResponseMeta {
            version: "0.1.0".to_string(),
            request_id: None,
        };
        let envelope = Envelope::ok(1, &meta);
        let value = serde_json::to_value(&envelope).expect("serializes");
        assert_eq!(value["meta"]["requestId"], serde_json::Value::Null);
    }
}
