//! Account repository for database operations.

use sqlx::PgPool;

use souq_core::AccountId;

use super::RepositoryError;
use crate::models::account::{Account, ProfileUpdate, SellerWithAddresses};

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            r"
            SELECT *
            FROM accounts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Whether the account carries the seller flag.
    ///
    /// Returns `None` if the account does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_seller(&self, id: AccountId) -> Result<Option<bool>, RepositoryError> {
        let row = sqlx::query_scalar::<_, bool>(
            r"
            SELECT is_seller
            FROM accounts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a partial profile update.
    ///
    /// Absent fields are left unchanged; `updated_at` and `last_active` are
    /// always bumped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: AccountId,
        changes: &ProfileUpdate,
    ) -> Result<Account, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            r"
            UPDATE accounts
            SET full_name  = COALESCE($2, full_name),
                avatar_url = COALESCE($3, avatar_url),
                bio        = COALESCE($4, bio),
                is_seller  = COALESCE($5, is_seller),
                updated_at  = now(),
                last_active = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(changes.full_name.as_deref())
        .bind(changes.avatar_url.as_deref())
        .bind(changes.bio.as_deref())
        .bind(changes.is_seller)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(account)
    }

    /// List seller accounts ordered by trust score, each with its aggregated
    /// address rows (defaults first).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sellers(&self) -> Result<Vec<SellerWithAddresses>, RepositoryError> {
        let sellers = sqlx::query_as::<_, SellerWithAddresses>(
            r"
            SELECT a.*,
                   COALESCE(
                       json_agg(to_jsonb(addr) ORDER BY addr.is_default DESC, addr.created_at DESC)
                           FILTER (WHERE addr.id IS NOT NULL),
                       '[]'::json
                   ) AS address
            FROM accounts a
            LEFT JOIN addresses addr ON addr.account_id = a.id
            WHERE a.is_seller = TRUE
            GROUP BY a.id
            ORDER BY a.trust_score DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(sellers)
    }
}
