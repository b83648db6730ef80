//! Database operations for the marketplace `PostgreSQL`.
//!
//! ## Tables
//!
//! - `accounts` - Identity records keyed by phone number
//! - `otps` - Ephemeral one-time codes (at most one live row per phone)
//! - `addresses` - Delivery addresses (application-enforced single default)
//! - `categories` - Flat reference entities
//! - `products` - Marketplace listings
//! - `interactions` - Product comments with one level of threading
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p souq-cli -- migrate
//! ```
//!
//! Queries use the runtime-checked API (`sqlx::query_as` + `FromRow`) so the
//! crate builds without a live database or offline cache.

pub mod accounts;
pub mod addresses;
pub mod categories;
pub mod interactions;
pub mod otps;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;
pub use addresses::AddressRepository;
pub use categories::CategoryRepository;
pub use interactions::InteractionRepository;
pub use otps::OtpRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate phone number, missing referenced row).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create a pool handle without connecting.
///
/// Used by router tests that never reach the database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(database_url.expose_secret())
}

/// Map a sqlx error, translating unique and foreign-key violations into
/// [`RepositoryError::Conflict`].
pub(crate) fn map_constraint_violation(e: sqlx::Error, conflict_message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
    {
        return RepositoryError::Conflict(conflict_message.to_owned());
    }
    RepositoryError::Database(e)
}
