//! Address repository.

use sqlx::PgPool;

use souq_core::{AccountId, AddressId};

use super::RepositoryError;
use crate::models::address::{Address, NewAddress};

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the account's addresses, default first, then newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, Address>(
            r"
            SELECT *
            FROM addresses
            WHERE account_id = $1
            ORDER BY is_default DESC, created_at DESC
            ",
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Check whether the account already has an address with the same
    /// governorate, district, and street.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_duplicate(
        &self,
        account_id: AccountId,
        details: &NewAddress,
    ) -> Result<Option<AddressId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, AddressId>(
            r"
            SELECT id
            FROM addresses
            WHERE account_id = $1
              AND governorate = $2
              AND city_district = $3
              AND street_address = $4
            ",
        )
        .bind(account_id)
        .bind(&details.governorate)
        .bind(&details.city_district)
        .bind(&details.street_address)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// Insert a new address for the account.
    ///
    /// When the new address is flagged default, every other address of the
    /// account is cleared first; both statements run in one transaction so
    /// at most one default survives.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn insert(
        &self,
        account_id: AccountId,
        details: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if details.is_default {
            sqlx::query(
                r"
                UPDATE addresses
                SET is_default = FALSE
                WHERE account_id = $1
                ",
            )
            .bind(account_id)
            .execute(&mut *tx)
            .await?;
        }

        let address = sqlx::query_as::<_, Address>(
            r"
            INSERT INTO addresses
                (account_id, governorate, city_district, street_address,
                 nearest_landmark, lat_long, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(account_id)
        .bind(&details.governorate)
        .bind(&details.city_district)
        .bind(&details.street_address)
        .bind(&details.nearest_landmark)
        .bind(details.lat_long.as_deref())
        .bind(details.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(address)
    }

    /// Delete an address scoped to its owning account.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: AddressId,
        account_id: AccountId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM addresses
            WHERE id = $1 AND account_id = $2
            ",
        )
        .bind(id)
        .bind(account_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
