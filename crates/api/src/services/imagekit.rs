//! ImageKit upload client.
//!
//! Re-encodes an uploaded file into a multipart form addressed to the
//! ImageKit upload API. The purpose tag selects the destination folder.

use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use souq_core::ImagePurpose;

use crate::config::ImageHostConfig;

/// ImageKit upload endpoint.
const UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

/// Errors that can occur when uploading to the image host.
#[derive(Debug, Error)]
pub enum ImageHostError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the form or parse the response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A successfully hosted image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Public URL of the hosted file
    pub url: String,
    /// Host-side file identifier
    pub file_id: String,
}

/// ImageKit API client.
#[derive(Clone)]
pub struct ImageKitClient {
    client: reqwest::Client,
    private_key: SecretString,
}

impl ImageKitClient {
    /// Create a new ImageKit client.
    #[must_use]
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            private_key: config.private_key.clone(),
        }
    }

    /// Upload one file and return its hosted URL and identifier.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the host rejects the upload, or
    /// the response cannot be parsed.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
        purpose: ImagePurpose,
    ) -> Result<UploadedImage, ImageHostError> {
        let mut part = multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        if let Some(content_type) = content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ImageHostError::Parse(format!("invalid content type: {e}")))?;
        }

        let form = multipart::Form::new()
            .part("file", part)
            .text("fileName", file_name.to_owned())
            .text("folder", folder_for(purpose))
            .text("useUniqueFileName", "true");

        let response = self
            .client
            .post(UPLOAD_URL)
            .basic_auth(self.private_key.expose_secret(), Some(""))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageHostError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadedImage = response
            .json()
            .await
            .map_err(|e| ImageHostError::Parse(e.to_string()))?;

        Ok(uploaded)
    }
}

/// Destination folder for a purpose tag, e.g. `/avatars`.
const fn folder_for(purpose: ImagePurpose) -> &'static str {
    match purpose {
        ImagePurpose::Avatar => "/avatars",
        ImagePurpose::Product => "/products",
        ImagePurpose::Banner => "/banners",
        ImagePurpose::Others => "/others",
    }
}
