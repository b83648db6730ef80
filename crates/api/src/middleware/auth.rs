//! Bearer authentication extractor.
//!
//! Protected routes take [`RequireAuth`], which verifies the
//! `Authorization: Bearer <token>` header against the token signer and
//! yields the caller's identity. Verification is purely cryptographic - the
//! account row is not re-read here.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use souq_core::AccountId;

use crate::error::ApiError;
use crate::middleware::RequestId;
use crate::response::ResponseMeta;
use crate::state::AppState;

/// The identity established by a verified bearer token.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub id: AccountId,
    pub phone: String,
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(account): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", account.phone)
/// }
/// ```
pub struct RequireAuth(pub CurrentAccount);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let meta = ResponseMeta {
            version: state.config().app_version.clone(),
            request_id: parts.extensions.get::<RequestId>().map(|id| id.0.clone()),
        };

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized(&meta))?;

        let claims = state.tokens().verify(token).map_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
            unauthorized(&meta)
        })?;

        Ok(Self(CurrentAccount {
            id: claims.id,
            phone: claims.phone,
        }))
    }
}

/// The fixed 401 returned for a missing, malformed, or invalid token.
fn unauthorized(meta: &ResponseMeta) -> ApiError {
    ApiError::unauthorized("UNAUTHORIZED", "Authorization token is missing or invalid")
        .with_meta(meta)
}
