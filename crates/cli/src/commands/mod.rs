//! CLI command implementations.

pub mod migrate;
pub mod seed;

/// Errors shared by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL, preferring `SOUQ_DATABASE_URL` over the
/// generic `DATABASE_URL`.
pub fn database_url() -> Result<String, CommandError> {
    std::env::var("SOUQ_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("SOUQ_DATABASE_URL"))
}
