//! Product models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use souq_core::{AccountId, CategoryId, ProductId};

use crate::error::ValidationIssue;

/// A marketplace listing belonging to one seller account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub seller_id: AccountId,
    pub category_id: CategoryId,
    pub title: String,
    pub description: String,
    /// Price in whole Iraqi dinars
    pub price_iqd: i64,
    pub main_image: String,
    pub availability_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New listing payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub title: String,
    pub description: String,
    pub price_iqd: i64,
    pub main_image: String,
}

impl NewProduct {
    /// Validate field constraints.
    ///
    /// # Errors
    ///
    /// Returns the list of field issues when any constraint is violated.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if !(3..=100).contains(&self.title.len()) {
            issues.push(ValidationIssue::new("title", "must be 3 to 100 characters"));
        }
        if !(10..=1000).contains(&self.description.len()) {
            issues.push(ValidationIssue::new(
                "description",
                "must be 10 to 1000 characters",
            ));
        }
        if self.price_iqd <= 0 {
            issues.push(ValidationIssue::new("price_iqd", "must be positive"));
        }
        if url::Url::parse(&self.main_image).is_err() {
            issues.push(ValidationIssue::new("main_image", "must be a valid URL"));
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// A listing row joined with a seller summary, used by the public listing.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductWithSeller {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    /// `{ full_name, avatar_url, trust_score }`
    pub seller: Json<serde_json::Value>,
}

/// The single-product fan-out: product, category name, seller profile with
/// the seller's address rows.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    /// `{ name }`
    pub category: Json<serde_json::Value>,
    /// `{ full_name, phone_number, avatar_url, trust_score, address: [...] }`
    pub seller: Json<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn payload() -> NewProduct {
        NewProduct {
            category_id: CategoryId::new(Uuid::new_v4()),
            title: "E2E Test Engine Part".to_string(),
            description: "Compatible with most 2020+ sedan models.".to_string(),
            price_iqd: 125_000,
            main_image: "https://ik.imagekit.io/souq/test-part.jpg".to_string(),
        }
    }

    #[test]
    fn test_new_product_valid() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_new_product_title_bounds() {
        let mut body = payload();
        body.title = "ab".to_string();
        assert!(body.validate().is_err());
        body.title = "x".repeat(101);
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_new_product_price_must_be_positive() {
        let mut body = payload();
        body.price_iqd = 0;
        let issues = body.validate().expect_err("price issue");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "price_iqd");
    }

    #[test]
    fn test_new_product_image_must_be_url() {
        let mut body = payload();
        body.main_image = "test-part.jpg".to_string();
        assert!(body.validate().is_err());
    }
}
