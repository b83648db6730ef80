//! Product route handlers.

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;

use souq_core::{AccountId, CategoryId, ProductId};

use crate::db::{AccountRepository, ProductRepository, products::ProductFilter};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, RequireAuth};
use crate::models::product::{NewProduct, Product, ProductDetail, ProductWithSeller};
use crate::response::{Envelope, ResponseMeta};
use crate::state::AppState;

/// Query parameters for the public listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(rename = "sellerId")]
    pub seller_id: Option<AccountId>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<CategoryId>,
}

/// POST /products
///
/// Only accounts carrying the seller flag may list products; new listings
/// start in the initial availability status.
pub async fn create_product(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(current): RequireAuth,
    ApiJson(details): ApiJson<NewProduct>,
) -> Result<Envelope<Product>, ApiError> {
    if let Err(issues) = details.validate() {
        return Err(ApiError::validation(issues).with_meta(&meta));
    }

    let is_seller = AccountRepository::new(state.pool())
        .is_seller(current.id)
        .await
        .map_err(|e| {
            ApiError::database("CREATE_PRODUCT_FAILED", &e, StatusCode::BAD_REQUEST)
                .with_meta(&meta)
        })?;

    if is_seller != Some(true) {
        return Err(ApiError::forbidden(
            "NOT_A_SELLER",
            "Only registered sellers can list products",
        )
        .with_meta(&meta));
    }

    let product = ProductRepository::new(state.pool())
        .insert(current.id, &details)
        .await
        .map_err(|e| {
            ApiError::database("CREATE_PRODUCT_FAILED", &e, StatusCode::BAD_REQUEST)
                .with_meta(&meta)
        })?;

    Ok(Envelope::created(product, &meta))
}

/// GET /products
pub async fn get_products(
    State(state): State<AppState>,
    meta: ResponseMeta,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> Result<Envelope<Vec<ProductWithSeller>>, ApiError> {
    let filter = ProductFilter {
        seller_id: query.seller_id,
        category_id: query.category_id,
    };

    let products = ProductRepository::new(state.pool())
        .list(&filter)
        .await
        .map_err(|e| {
            ApiError::database(
                "FETCH_PRODUCTS_FAILED",
                &e,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .with_meta(&meta)
        })?;

    Ok(Envelope::ok(products, &meta))
}

/// GET /products/{id}
///
/// Single fan-out query: product, category name, seller profile, and the
/// seller's addresses. "No row" is reported as 404 distinctly from other
/// database failures.
pub async fn get_product_by_id(
    State(state): State<AppState>,
    meta: ResponseMeta,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Envelope<ProductDetail>, ApiError> {
    let detail = ProductRepository::new(state.pool())
        .find_detail(id)
        .await
        .map_err(|e| {
            ApiError::database("DB_ERROR", &e, StatusCode::BAD_REQUEST).with_meta(&meta)
        })?
        .ok_or_else(|| ApiError::not_found("NOT_FOUND", "Product not found").with_meta(&meta))?;

    Ok(Envelope::ok(detail, &meta))
}
