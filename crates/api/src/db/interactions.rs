//! Interaction (comment) repository.

use sqlx::PgPool;

use souq_core::{AccountId, ProductId};

use super::{RepositoryError, map_constraint_violation};
use crate::models::interaction::{InteractionWithSender, NewInteraction};

/// Repository for comment database operations.
pub struct InteractionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InteractionRepository<'a> {
    /// Create a new interaction repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a product's comments oldest first, each with sender display
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<InteractionWithSender>, RepositoryError> {
        let rows = sqlx::query_as::<_, InteractionWithSender>(
            r"
            SELECT i.*,
                   json_build_object(
                       'full_name', a.full_name,
                       'avatar_url', a.avatar_url
                   ) AS sender
            FROM interactions i
            JOIN accounts a ON a.id = i.sender_id
            WHERE i.product_id = $1
            ORDER BY i.created_at ASC
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a comment and return it with the sender display fields joined
    /// on the creation response.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the referenced product or
    /// parent comment doesn't exist. Returns `RepositoryError::Database` for
    /// other database errors.
    pub async fn insert(
        &self,
        sender_id: AccountId,
        details: &NewInteraction,
    ) -> Result<InteractionWithSender, RepositoryError> {
        let row = sqlx::query_as::<_, InteractionWithSender>(
            r"
            WITH ins AS (
                INSERT INTO interactions (product_id, sender_id, parent_id, message)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT ins.*,
                   json_build_object(
                       'full_name', a.full_name,
                       'avatar_url', a.avatar_url
                   ) AS sender
            FROM ins
            JOIN accounts a ON a.id = ins.sender_id
            ",
        )
        .bind(details.product_id)
        .bind(sender_id)
        .bind(details.parent_id)
        .bind(&details.message)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "referenced product or comment does not exist"))?;

        Ok(row)
    }
}
