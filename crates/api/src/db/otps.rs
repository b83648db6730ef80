//! One-time code repository.
//!
//! The `otps` table holds at most one row per phone number (unique key on
//! `identifier`), so "issue or overwrite" is a single upsert.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use souq_core::OtpId;

use super::RepositoryError;
use crate::models::account::Account;
use crate::models::otp::OtpCode;

/// Repository for one-time code operations.
pub struct OtpRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OtpRepository<'a> {
    /// Create a new OTP repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the code row for a phone number, live or expired.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<OtpCode>, RepositoryError> {
        let row = sqlx::query_as::<_, OtpCode>(
            r"
            SELECT *
            FROM otps
            WHERE identifier = $1
            ",
        )
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Insert a fresh code row or overwrite the existing one's code and
    /// expiry (conflict target: `identifier`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_code(
        &self,
        identifier: &str,
        code: &str,
        purpose: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<OtpCode, RepositoryError> {
        let row = sqlx::query_as::<_, OtpCode>(
            r"
            INSERT INTO otps (identifier, code, purpose, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (identifier)
            DO UPDATE SET code = EXCLUDED.code,
                          expires_at = EXCLUDED.expires_at,
                          updated_at = now()
            RETURNING *
            ",
        )
        .bind(identifier)
        .bind(code)
        .bind(purpose)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Extend the expiry of a live code without changing its value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn extend_expiry(
        &self,
        id: OtpId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE otps
            SET expires_at = $1,
                updated_at = now()
            WHERE id = $2
            ",
        )
        .bind(expires_at)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Atomically consume a matching, unexpired code and upsert the account
    /// for its phone number.
    ///
    /// Both steps run in one transaction: the code row is deleted (single
    /// use), then the account is inserted or touched on conflict with the
    /// phone number. Returns `None` without mutating anything when no row
    /// matches identifier + code + unexpired expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn verify_and_consume(
        &self,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let consumed: Option<OtpId> = sqlx::query_scalar(
            r"
            DELETE FROM otps
            WHERE identifier = $1
              AND code = $2
              AND expires_at > $3
            RETURNING id
            ",
        )
        .bind(identifier)
        .bind(code)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        if consumed.is_none() {
            // No match: leave any stored code untouched.
            return Ok(None);
        }

        let account = sqlx::query_as::<_, Account>(
            r"
            INSERT INTO accounts (phone_number)
            VALUES ($1)
            ON CONFLICT (phone_number)
            DO UPDATE SET updated_at = now(),
                          last_active = now()
            RETURNING *
            ",
        )
        .bind(identifier)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(account))
    }
}
