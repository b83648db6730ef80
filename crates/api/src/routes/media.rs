//! Media upload route handler.
//!
//! Accepts exactly one multipart file, re-encodes it into a multipart form
//! addressed to the image host, and returns the hosted URL and file id.

use axum::extract::{Multipart, State};
use serde::Deserialize;

use souq_core::ImagePurpose;

use crate::error::ApiError;
use crate::middleware::{ApiQuery, RequireAuth};
use crate::response::{Envelope, ResponseMeta};
use crate::services::{ImageHostError, UploadedImage};
use crate::state::AppState;

/// Upload size cap applied to the multipart body.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Fallback filename when the client part carries none.
const DEFAULT_FILE_NAME: &str = "upload";

/// Query parameters for `POST /media/upload`.
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub purpose: ImagePurpose,
}

/// POST /media/upload
///
/// The purpose tag selects the destination folder on the host. A missing
/// file is a client error, not an exception.
pub async fn upload_image(
    State(state): State<AppState>,
    meta: ResponseMeta,
    RequireAuth(_current): RequireAuth,
    ApiQuery(query): ApiQuery<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Envelope<UploadedImage>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|err| {
            // Covers oversized bodies as well as malformed multipart input.
            ApiError::bad_request("UPLOAD_FAILED", err.body_text()).with_meta(&meta)
        })?
        .ok_or_else(|| ApiError::bad_request("NO_FILE", "No file uploaded").with_meta(&meta))?;

    let file_name = field
        .file_name()
        .map_or_else(|| DEFAULT_FILE_NAME.to_string(), ToOwned::to_owned);
    let content_type = field.content_type().map(ToOwned::to_owned);

    let bytes = field.bytes().await.map_err(|err| {
        ApiError::bad_request("UPLOAD_FAILED", err.body_text()).with_meta(&meta)
    })?;

    let uploaded = state
        .images()
        .upload(
            &file_name,
            content_type.as_deref(),
            bytes.to_vec(),
            query.purpose,
        )
        .await
        .map_err(|err| match err {
            ImageHostError::Api { status, message } => {
                tracing::error!(status, message = %message, "image host rejected upload");
                ApiError::internal("IMAGEKIT_ERROR", message).with_meta(&meta)
            }
            other => {
                tracing::error!(error = %other, "image upload failed");
                ApiError::internal("UPLOAD_FAILED", "Failed to upload image").with_meta(&meta)
            }
        })?;

    Ok(Envelope::created(uploaded, &meta))
}
