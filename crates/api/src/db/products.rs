//! Product repository.

use sqlx::{PgPool, QueryBuilder};

use souq_core::{AccountId, AvailabilityStatus, CategoryId, ProductId};

use super::{RepositoryError, map_constraint_violation};
use crate::models::product::{NewProduct, Product, ProductDetail, ProductWithSeller};

/// Maximum number of rows returned by the public listing.
const LISTING_LIMIT: i64 = 50;

/// Optional listing filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub seller_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new listing for the seller with the initial availability
    /// status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the referenced category doesn't
    /// exist. Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        seller_id: AccountId,
        details: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products
                (seller_id, category_id, title, description, price_iqd,
                 main_image, availability_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(seller_id)
        .bind(details.category_id)
        .bind(&details.title)
        .bind(&details.description)
        .bind(details.price_iqd)
        .bind(&details.main_image)
        .bind(AvailabilityStatus::InStock.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "referenced category does not exist"))?;

        Ok(product)
    }

    /// List in-stock products, newest first, with a seller summary per row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithSeller>, RepositoryError> {
        let mut query = QueryBuilder::<sqlx::Postgres>::new(
            r"
            SELECT p.*,
                   json_build_object(
                       'full_name', a.full_name,
                       'avatar_url', a.avatar_url,
                       'trust_score', a.trust_score
                   ) AS seller
            FROM products p
            JOIN accounts a ON a.id = p.seller_id
            WHERE p.availability_status = ",
        );
        query.push_bind(AvailabilityStatus::InStock.as_str());

        if let Some(seller_id) = filter.seller_id {
            query.push(" AND p.seller_id = ");
            query.push_bind(seller_id);
        }
        if let Some(category_id) = filter.category_id {
            query.push(" AND p.category_id = ");
            query.push_bind(category_id);
        }

        query.push(" ORDER BY p.created_at DESC LIMIT ");
        query.push_bind(LISTING_LIMIT);

        let rows = query
            .build_query_as::<ProductWithSeller>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Fetch one product with its category name, seller profile, and the
    /// seller's address rows - a single fan-out query.
    ///
    /// Returns `None` when no product matches, so the handler can report 404
    /// distinctly from other database failures.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_detail(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductDetail>(
            r"
            SELECT p.*,
                   json_build_object('name', c.name) AS category,
                   json_build_object(
                       'full_name', s.full_name,
                       'phone_number', s.phone_number,
                       'avatar_url', s.avatar_url,
                       'trust_score', s.trust_score,
                       'address', COALESCE(
                           (SELECT json_agg(to_jsonb(addr)
                                            ORDER BY addr.is_default DESC, addr.created_at DESC)
                            FROM addresses addr
                            WHERE addr.account_id = s.id),
                           '[]'::json
                       )
                   ) AS seller
            FROM products p
            JOIN categories c ON c.id = p.category_id
            JOIN accounts s ON s.id = p.seller_id
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
