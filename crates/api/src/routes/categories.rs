//! Category route handlers.

use axum::{extract::State, http::StatusCode};

use crate::db::CategoryRepository;
use crate::error::ApiError;
use crate::models::category::Category;
use crate::response::{Envelope, ResponseMeta};
use crate::state::AppState;

/// GET /categories
pub async fn get_categories(
    State(state): State<AppState>,
    meta: ResponseMeta,
) -> Result<Envelope<Vec<Category>>, ApiError> {
    let categories = CategoryRepository::new(state.pool())
        .list()
        .await
        .map_err(|e| {
            ApiError::database(
                "FETCH_CATEGORIES_FAILED",
                &e,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .with_meta(&meta)
        })?;

    Ok(Envelope::ok(categories, &meta))
}
