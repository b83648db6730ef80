//! Extractors that reject with enveloped validation errors.
//!
//! Axum's stock `Json`/`Query`/`Path` rejections are plain-text responses;
//! these wrappers convert them into the standard envelope with a
//! `VALIDATION_ERROR` code so malformed input never bypasses the response
//! contract.

use axum::{
    extract::{FromRequest, FromRequestParts, Json, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::middleware::RequestId;
use crate::response::ResponseMeta;
use crate::state::AppState;

/// `Json<T>` with an enveloped rejection.
pub struct ApiJson<T>(pub T);

impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let meta = meta_from_parts(&req.extensions().get::<RequestId>().cloned(), state);

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                Err(ApiError::bad_request("VALIDATION_ERROR", rejection.body_text())
                    .with_meta(&meta))
            }
        }
    }
}

/// `Query<T>` with an enveloped rejection.
pub struct ApiQuery<T>(pub T);

impl<T> FromRequestParts<AppState> for ApiQuery<T>
where
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let meta = meta_from_parts(&parts.extensions.get::<RequestId>().cloned(), state);

        match Query::<T>::try_from_uri(&parts.uri) {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                Err(ApiError::bad_request("VALIDATION_ERROR", rejection.body_text())
                    .with_meta(&meta))
            }
        }
    }
}

/// `Path<T>` with an enveloped rejection.
pub struct ApiPath<T>(pub T);

impl<T> FromRequestParts<AppState> for ApiPath<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let meta = meta_from_parts(&parts.extensions.get::<RequestId>().cloned(), state);

        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                Err(ApiError::bad_request("VALIDATION_ERROR", rejection.body_text())
                    .with_meta(&meta))
            }
        }
    }
}

fn meta_from_parts(request_id: &Option<RequestId>, state: &AppState) -> ResponseMeta {
    ResponseMeta {
        version: state.config().app_version.clone(),
        request_id: request_id.as_ref().map(|id| id.0.clone()),
    }
}
