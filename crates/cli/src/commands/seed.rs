//! Reference data seeding.

use sqlx::PgPool;

use super::{CommandError, database_url};

/// The default category set. Inserts skip names that already exist, so the
/// command is safe to re-run.
const DEFAULT_CATEGORIES: &[&str] = &[
    "Auto Parts",
    "Books & Hobbies",
    "Electronics",
    "Fashion",
    "Home & Furniture",
    "Vehicles",
];

/// Seed the default categories.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing, the connection
/// fails, or an insert fails.
pub async fn categories() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let mut inserted = 0_u64;
    for name in DEFAULT_CATEGORIES {
        let result = sqlx::query(
            r"
            INSERT INTO categories (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(name)
        .execute(&pool)
        .await?;
        inserted += result.rows_affected();
    }

    tracing::info!(
        inserted,
        total = DEFAULT_CATEGORIES.len(),
        "Category seeding complete"
    );
    Ok(())
}
