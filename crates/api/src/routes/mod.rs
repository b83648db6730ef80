//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure (nested under the versioned base path, default `/api/v1`)
//!
//! ```text
//! # Auth (public)
//! POST /auth/request-otp           - Issue or refresh a one-time code
//! POST /auth/verify-otp            - Verify a code, mint a bearer token
//!
//! # Users (bearer-gated)
//! GET   /users/me                  - Caller's account
//! PATCH /users/me                  - Partial profile update
//! GET   /users/sellers             - Seller accounts with addresses
//!
//! # Addresses (bearer-gated)
//! GET    /addresses                - Caller's addresses
//! POST   /addresses                - Create (duplicate-checked, single default)
//! DELETE /addresses/{id}           - Delete, scoped to caller
//!
//! # Categories
//! GET /categories                  - All categories (public)
//!
//! # Products
//! GET  /products                   - In-stock listings (public, filterable)
//! GET  /products/{id}              - Fan-out detail (public)
//! POST /products                   - Create listing (bearer-gated, sellers only)
//!
//! # Interactions
//! GET  /interactions/product/{productId} - Product comments (public)
//! POST /interactions               - Post comment (bearer-gated)
//!
//! # Media
//! POST /media/upload               - Multipart upload to the image host
//!                                    (bearer-gated, size-capped)
//! ```

pub mod addresses;
pub mod auth;
pub mod categories;
pub mod interactions;
pub mod media;
pub mod products;
pub mod users;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::middleware::request_id_middleware;
use crate::response::{Envelope, ResponseMeta};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/request-otp", post(auth::request_otp))
        .route("/verify-otp", post(auth::verify_otp))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::get_me).patch(users::update_me))
        .route("/sellers", get(users::get_sellers))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route(
            "/",
            get(addresses::get_addresses).post(addresses::add_address),
        )
        .route("/{id}", delete(addresses::delete_address))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(categories::get_categories))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::get_products).post(products::create_product),
        )
        .route("/{id}", get(products::get_product_by_id))
}

/// Create the interaction routes router.
pub fn interaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(interactions::post_comment))
        .route("/product/{productId}", get(interactions::get_comments))
}

/// Create the media routes router.
///
/// The body limit caps multipart uploads at [`media::MAX_UPLOAD_BYTES`].
pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(media::upload_image))
        .layer(DefaultBodyLimit::max(media::MAX_UPLOAD_BYTES))
}

/// Create all routes for the versioned API base path.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/addresses", address_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/interactions", interaction_routes())
        .nest("/media", media_routes())
}

/// Fallback for unknown routes: an enveloped 404 instead of the framework's
/// bare response.
pub async fn not_found(meta: ResponseMeta) -> ApiError {
    ApiError::not_found("ROUTE_NOT_FOUND", "Route not found").with_meta(&meta)
}

/// GET /health - liveness and environment tag.
pub async fn health(
    State(state): State<AppState>,
    meta: ResponseMeta,
) -> Envelope<serde_json::Value> {
    Envelope::ok(
        json!({
            "status": "online",
            "environment": state.config().environment.as_str(),
        }),
        &meta,
    )
}

/// Assemble the full application: versioned API routes, health endpoint,
/// enveloped fallback, and the middleware stack.
///
/// Sentry layers are attached by the binary so tests don't need a Sentry
/// client.
pub fn app(state: AppState) -> Router {
    let api_base = state.config().api_base();

    Router::new()
        .route("/health", get(health))
        .nest(&api_base, routes())
        .fallback(not_found)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::config::{ApiConfig, Environment, ImageHostConfig, SmsConfig};
    use crate::db::create_lazy_pool;
    use crate::state::AppState;

    /// Router wired to a lazy pool; requests below never reach the database.
    fn test_app() -> axum::Router {
        let config = ApiConfig {
            app_name: "souq-api".to_string(),
            app_version: "0.1.0".to_string(),
            database_url: SecretString::from("postgres://localhost:5432/souq_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            environment: Environment::Test,
            api_prefix: "api".to_string(),
            api_version: "v1".to_string(),
            token_secret: SecretString::from("kQ9#mW2$xR7!pL4@nV8^zD3&cF6*bH1%"),
            sms: SmsConfig {
                api_key: SecretString::from("sms-key"),
                country_code: "964".to_string(),
            },
            images: ImageHostConfig {
                private_key: SecretString::from("imagekit-key"),
            },
            sentry_dsn: None,
        };
        let pool = create_lazy_pool(&config.database_url).unwrap();
        let state = AppState::new(config, pool).unwrap();
        super::app(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_environment() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "online");
        assert_eq!(body["data"]["environment"], "test");
        assert_eq!(body["statusCode"], 200);
    }

    #[tokio::test]
    async fn test_unknown_route_is_enveloped_404() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "ROUTE_NOT_FOUND");
        assert_eq!(body["data"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_request_id_header_is_echoed() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-abc");
        let body = body_json(response).await;
        assert_eq!(body["meta"]["requestId"], "req-abc");
    }

    #[tokio::test]
    async fn test_protected_route_rejects_missing_token() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(
            body["error"]["message"],
            "Authorization token is missing or invalid"
        );
    }

    #[tokio::test]
    async fn test_protected_route_rejects_garbage_token() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/interactions")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"product_id": "x", "message": "hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_request_otp_rejects_short_phone() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/request-otp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"phoneNumber": "12345"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"][0]["field"], "phoneNumber");
    }

    #[tokio::test]
    async fn test_verify_otp_rejects_short_code() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/verify-otp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"phoneNumber": "7886474987", "code": "123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_product_listing_rejects_malformed_filter() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products?sellerId=not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_enveloped() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/request-otp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
