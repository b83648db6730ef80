//! User profile route handlers.

use axum::{extract::State, http::StatusCode};

use crate::db::AccountRepository;
use crate::error::ApiError;
use crate::middleware::{ApiJson, RequireAuth};
use crate::models::account::{Account, ProfileUpdate, SellerWithAddresses};
use crate::response::{Envelope, ResponseMeta};
use crate::state::AppState;

/// GET /users/me
pub async fn get_me(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(current): RequireAuth,
) -> Result<Envelope<Account>, ApiError> {
    let account = AccountRepository::new(state.pool())
        .find_by_id(current.id)
        .await
        .map_err(|e| {
            ApiError::database("SERVER_ERROR", &e, StatusCode::INTERNAL_SERVER_ERROR)
                .with_meta(&meta)
        })?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found").with_meta(&meta))?;

    Ok(Envelope::ok(account, &meta))
}

/// PATCH /users/me
///
/// Partial profile update. Becoming a seller requires a real display name:
/// either already on the account or supplied in the same request, non-empty
/// and not the placeholder default.
pub async fn update_me(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(current): RequireAuth,
    ApiJson(updates): ApiJson<ProfileUpdate>,
) -> Result<Envelope<Account>, ApiError> {
    if let Err(issues) = updates.validate() {
        return Err(ApiError::validation(issues).with_meta(&meta));
    }

    let repo = AccountRepository::new(state.pool());

    if updates.is_seller == Some(true) {
        let account = repo
            .find_by_id(current.id)
            .await
            .map_err(|e| {
                ApiError::database("UPDATE_FAILED", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
            })?
            .ok_or_else(|| {
                ApiError::not_found("USER_NOT_FOUND", "User not found").with_meta(&meta)
            })?;

        // The name supplied in this request counts toward the check.
        let candidate = Account {
            full_name: updates.full_name.clone().or(account.full_name.clone()),
            ..account
        };

        if !candidate.has_completed_profile() {
            return Err(ApiError::bad_request(
                "PROFILE_INCOMPLETE",
                "Please complete your full name before becoming a seller.",
            )
            .with_meta(&meta));
        }
    }

    let updated = repo.update_profile(current.id, &updates).await.map_err(|e| {
        ApiError::database("UPDATE_FAILED", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
    })?;

    Ok(Envelope::ok(updated, &meta))
}

/// GET /users/sellers
pub async fn get_sellers(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(_current): RequireAuth,
) -> Result<Envelope<Vec<SellerWithAddresses>>, ApiError> {
    let sellers = AccountRepository::new(state.pool())
        .list_sellers()
        .await
        .map_err(|e| {
            ApiError::database(
                "FETCH_SELLERS_FAILED",
                &e,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .with_meta(&meta)
        })?;

    Ok(Envelope::ok(sellers, &meta))
}
