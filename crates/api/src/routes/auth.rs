//! OTP authentication route handlers.
//!
//! Per phone number the code row moves through
//! `NoCode -> Active -> (Verified | Expired)`:
//! - **request-otp** issues a fresh 6-digit code, or extends the expiry of a
//!   live one without changing its value (repeat requests cannot cycle codes).
//! - **verify-otp** consumes a matching unexpired code, upserts the account,
//!   and mints the bearer token.

use axum::{extract::State, http::StatusCode};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use souq_core::{OtpPurpose, PhoneNumber};

use crate::db::OtpRepository;
use crate::error::{ApiError, ValidationIssue};
use crate::middleware::ApiJson;
use crate::response::{Envelope, ResponseMeta};
use crate::services::TokenClaims;
use crate::state::AppState;

/// How long an issued code stays valid.
const OTP_TTL_MINUTES: i64 = 10;

/// Placeholder echoed instead of the code outside development.
const CODE_SENT_PLACEHOLDER: &str = "SENT_SUCCESSFULLY";

/// Request body for `POST /auth/request-otp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpBody {
    pub phone_number: String,
}

/// Request body for `POST /auth/verify-otp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpBody {
    pub phone_number: String,
    pub code: String,
}

/// POST /auth/request-otp
///
/// Issues or refreshes the one-time code for a phone number and dispatches
/// it through the SMS gateway. Dispatch failure is logged but does not fail
/// the request - the code is already persisted and stands until expiry.
pub async fn request_otp(
    State(state): State<AppState>,
    meta: ResponseMeta,
    ApiJson(body): ApiJson<RequestOtpBody>,
) -> Result<Envelope<serde_json::Value>, ApiError> {
    let phone = parse_phone(&body.phone_number, &meta)?;

    let now = Utc::now();
    let expiry = now + Duration::minutes(OTP_TTL_MINUTES);
    let repo = OtpRepository::new(state.pool());

    let existing = repo.find_by_identifier(phone.as_str()).await.map_err(|e| {
        ApiError::database("OTP_REQUEST_FAILED", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
    })?;

    let code = match existing {
        // Live code: reuse the value, only extend the expiry.
        Some(otp) if !otp.is_expired(now) => {
            repo.extend_expiry(otp.id, expiry).await.map_err(|e| {
                ApiError::database("OTP_REQUEST_FAILED", &e, StatusCode::BAD_REQUEST)
                    .with_meta(&meta)
            })?;
            otp.code
        }
        // Absent or expired: a fresh code overwrites whatever is there.
        _ => {
            let code = generate_otp_code();
            repo.upsert_code(
                phone.as_str(),
                &code,
                OtpPurpose::PhoneNumberVerification.as_str(),
                expiry,
            )
            .await
            .map_err(|e| {
                ApiError::database("OTP_REQUEST_FAILED", &e, StatusCode::BAD_REQUEST)
                    .with_meta(&meta)
            })?;
            code
        }
    };

    // Best-effort dispatch: the caller can retry delivery through other
    // means, the persisted code stands either way.
    if let Err(err) = state.sms().send_verification_code(&phone, &code).await {
        tracing::error!(error = %err, "verification code dispatch failed");
    }

    let echoed_code = if state.config().environment.is_development() {
        code
    } else {
        CODE_SENT_PLACEHOLDER.to_string()
    };

    Ok(Envelope::ok(
        json!({
            "phoneNumber": phone.as_str(),
            "code": echoed_code,
        }),
        &meta,
    ))
}

/// POST /auth/verify-otp
///
/// Consumes a matching, unexpired code (single use), upserts the account
/// keyed by phone number, and returns the account with a signed bearer
/// token. No match leaves any stored code untouched and yields 401
/// `INVALID_OTP`.
pub async fn verify_otp(
    State(state): State<AppState>,
    meta: ResponseMeta,
    ApiJson(body): ApiJson<VerifyOtpBody>,
) -> Result<Envelope<serde_json::Value>, ApiError> {
    let phone = parse_phone(&body.phone_number, &meta)?;

    if body.code.len() != 6 || !body.code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::validation(vec![ValidationIssue::new(
            "code",
            "must be exactly 6 digits",
        )])
        .with_meta(&meta));
    }

    let repo = OtpRepository::new(state.pool());
    let account = repo
        .verify_and_consume(phone.as_str(), &body.code, Utc::now())
        .await
        .map_err(|e| {
            ApiError::database(
                "VERIFICATION_FAILED",
                &e,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .with_meta(&meta)
        })?
        .ok_or_else(|| {
            ApiError::unauthorized("INVALID_OTP", "Invalid or expired verification code")
                .with_meta(&meta)
        })?;

    let claims = TokenClaims::new(account.id, &account.phone_number);
    let token = state.tokens().sign(&claims).map_err(|err| {
        tracing::error!(error = %err, "failed to sign bearer token");
        ApiError::internal("VERIFICATION_FAILED", "Failed to issue token").with_meta(&meta)
    })?;

    Ok(Envelope::ok(
        json!({
            "user": account,
            "token": token,
            "message": "Verification successful",
        }),
        &meta,
    ))
}

/// Generate a 6-digit verification code, uniform in [100000, 999999].
fn generate_otp_code() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

fn parse_phone(raw: &str, meta: &ResponseMeta) -> Result<PhoneNumber, ApiError> {
    PhoneNumber::parse(raw).map_err(|e| {
        ApiError::validation(vec![ValidationIssue::new("phoneNumber", e.to_string())])
            .with_meta(meta)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_otp_code_format() {
        let code = generate_otp_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_otp_code_range() {
        for _ in 0..100 {
            let code: u32 = generate_otp_code().parse().expect("valid number");
            assert!(code >= 100_000);
            assert!(code < 1_000_000);
        }
    }

    #[test]
    fn test_bodies_use_camel_case() {
        let body: RequestOtpBody =
            serde_json::from_str(r#"{"phoneNumber": "7886474987"}"#).expect("deserializes");
        assert_eq!(body.phone_number, "7886474987");

        let body: VerifyOtpBody =
            serde_json::from_str(r#"{"phoneNumber": "7886474987", "code": "123456"}"#)
                .expect("deserializes");
        assert_eq!(body.code, "123456");
    }
}
