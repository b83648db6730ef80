//! Address route handlers.

use axum::{extract::State, http::StatusCode};
use serde_json::json;

use souq_core::AddressId;

use crate::db::AddressRepository;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiPath, RequireAuth};
use crate::models::address::{Address, NewAddress};
use crate::response::{Envelope, ResponseMeta};
use crate::state::AppState;

/// GET /addresses
pub async fn get_addresses(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(current): RequireAuth,
) -> Result<Envelope<Vec<Address>>, ApiError> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_account(current.id)
        .await
        .map_err(|e| {
            ApiError::database(
                "FETCH_ADDRESSES_FAILED",
                &e,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .with_meta(&meta)
        })?;

    Ok(Envelope::ok(addresses, &meta))
}

/// POST /addresses
///
/// Rejects an exact duplicate (same governorate + district + street) before
/// inserting. A new default clears every other default for the account in
/// the same transaction.
pub async fn add_address(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(current): RequireAuth,
    ApiJson(details): ApiJson<NewAddress>,
) -> Result<Envelope<Address>, ApiError> {
    if let Err(issues) = details.validate() {
        return Err(ApiError::validation(issues).with_meta(&meta));
    }

    let repo = AddressRepository::new(state.pool());

    let duplicate = repo
        .find_duplicate(current.id, &details)
        .await
        .map_err(|e| {
            ApiError::database("ADD_ADDRESS_FAILED", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
        })?;

    if duplicate.is_some() {
        return Err(
            ApiError::bad_request("ADDRESS_EXISTS", "This address already exists").with_meta(&meta),
        );
    }

    let address = repo.insert(current.id, &details).await.map_err(|e| {
        ApiError::database("ADD_ADDRESS_FAILED", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
    })?;

    Ok(Envelope::created(address, &meta))
}

/// DELETE /addresses/{id}
pub async fn delete_address(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(current): RequireAuth,
    ApiPath(id): ApiPath<AddressId>,
) -> Result<Envelope<serde_json::Value>, ApiError> {
    AddressRepository::new(state.pool())
        .delete(id, current.id)
        .await
        .map_err(|e| {
            ApiError::database("DELETE_FAILED", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
        })?;

    Ok(Envelope::ok(json!({ "success": true }), &meta))
}
