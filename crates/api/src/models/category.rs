//! Category model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use souq_core::CategoryId;

/// A flat reference entity; no hierarchy.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
