//! Interaction (comment) route handlers.

use axum::{extract::State, http::StatusCode};

use souq_core::ProductId;

use crate::db::InteractionRepository;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiPath, RequireAuth};
use crate::models::interaction::{InteractionWithSender, NewInteraction};
use crate::response::{Envelope, ResponseMeta};
use crate::state::AppState;

/// GET /interactions/product/{productId}
pub async fn get_comments(
    State(state): State<AppState>,
    meta: ResponseMeta,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Envelope<Vec<InteractionWithSender>>, ApiError> {
    let comments = InteractionRepository::new(state.pool())
        .list_for_product(product_id)
        .await
        .map_err(|e| {
            ApiError::database(
                "FETCH_COMMENTS_FAILED",
                &e,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .with_meta(&meta)
        })?;

    Ok(Envelope::ok(comments, &meta))
}

/// POST /interactions
///
/// The created row comes back with the sender's display fields joined on;
/// an optional parent reference gives one level of threading.
pub async fn post_comment(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(current): RequireAuth,
    ApiJson(details): ApiJson<NewInteraction>,
) -> Result<Envelope<InteractionWithSender>, ApiError> {
    if let Err(issues) = details.validate() {
        return Err(ApiError::validation(issues).with_meta(&meta));
    }

    let comment = InteractionRepository::new(state.pool())
        .insert(current.id, &details)
        .await
        .map_err(|e| {
            ApiError::database("POST_COMMENT_FAILED", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
        })?;

    Ok(Envelope::created(comment, &meta))
}
