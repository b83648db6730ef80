//! Interaction (comment) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use souq_core::{AccountId, InteractionId, ProductId};

use crate::error::ValidationIssue;

/// A comment on a product, optionally replying to a parent comment
/// (one level of threading; replies to replies are not fetched recursively).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Interaction {
    pub id: InteractionId,
    pub product_id: ProductId,
    pub sender_id: AccountId,
    pub parent_id: Option<InteractionId>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// New comment payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInteraction {
    pub product_id: ProductId,
    pub message: String,
    #[serde(default)]
    pub parent_id: Option<InteractionId>,
}

impl NewInteraction {
    /// Validate field constraints.
    ///
    /// # Errors
    ///
    /// Returns the list of field issues when any constraint is violated.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if self.message.is_empty() || self.message.len() > 500 {
            issues.push(ValidationIssue::new(
                "message",
                "must be 1 to 500 characters",
            ));
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// A comment joined with sender display fields.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InteractionWithSender {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub interaction: Interaction,
    /// `{ full_name, avatar_url }`
    pub sender: Json<serde_json::Value>,
}
