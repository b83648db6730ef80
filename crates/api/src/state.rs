//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::{ImageKitClient, OtpiqClient, SmsError, TokenSigner};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("sms client: {0}")]
    Sms(#[from] SmsError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, external clients, and
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    sms: OtpiqClient,
    images: ImageKitClient,
    tokens: TokenSigner,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if an external client fails to build.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, StateError> {
        let sms = OtpiqClient::new(&config.sms)?;
        let images = ImageKitClient::new(&config.images);
        let tokens = TokenSigner::new(config.token_secret.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                sms,
                images,
                tokens,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the SMS/WhatsApp gateway client.
    #[must_use]
    pub fn sms(&self) -> &OtpiqClient {
        &self.inner.sms
    }

    /// Get a reference to the image host client.
    #[must_use]
    pub fn images(&self) -> &ImageKitClient {
        &self.inner.images
    }

    /// Get a reference to the bearer token signer.
    #[must_use]
    pub fn tokens(&self) -> &TokenSigner {
        &self.inner.tokens
    }
}
