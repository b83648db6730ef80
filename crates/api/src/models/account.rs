//! Account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use souq_core::AccountId;

use crate::error::ValidationIssue;

/// An identity record keyed by phone number.
///
/// Created on first successful OTP verification; never hard-deleted by the
/// API itself.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: AccountId,
    pub phone_number: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_seller: bool,
    pub trust_score: i32,
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Placeholder display name assigned to accounts that never completed their
/// profile. Blocks the seller transition.
pub const PLACEHOLDER_FULL_NAME: &str = "User";

impl Account {
    /// Whether the profile carries a real display name (non-empty after
    /// trimming and not the placeholder default).
    #[must_use]
    pub fn has_completed_profile(&self) -> bool {
        self.full_name
            .as_deref()
            .map(str::trim)
            .is_some_and(|name| !name.is_empty() && name != PLACEHOLDER_FULL_NAME)
    }
}

/// Partial profile update payload.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub is_seller: Option<bool>,
}

impl ProfileUpdate {
    /// Validate field constraints.
    ///
    /// # Errors
    ///
    /// Returns the list of field issues when any constraint is violated.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if let Some(name) = &self.full_name
            && name.trim().len() < 3
        {
            issues.push(ValidationIssue::new(
                "full_name",
                "must be at least 3 characters",
            ));
        }

        if let Some(avatar_url) = &self.avatar_url
            && url::Url::parse(avatar_url).is_err()
        {
            issues.push(ValidationIssue::new("avatar_url", "must be a valid URL"));
        }

        if let Some(bio) = &self.bio
            && bio.len() > 160
        {
            issues.push(ValidationIssue::new("bio", "must be at most 160 characters"));
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// A seller account joined with its address rows.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SellerWithAddresses {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub account: Account,
    /// Aggregated address rows, defaults first
    pub address: Json<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn account(full_name: Option<&str>) -> Account {
        Account {
            id: AccountId::new(Uuid::new_v4()),
            phone_number: "7886474987".to_string(),
            full_name: full_name.map(String::from),
            bio: None,
            avatar_url: None,
            is_seller: false,
            trust_score: 0,
            last_active: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_completed_profile_requires_real_name() {
        assert!(account(Some("Engineering Test User")).has_completed_profile());
        assert!(!account(None).has_completed_profile());
        assert!(!account(Some("")).has_completed_profile());
        assert!(!account(Some("   ")).has_completed_profile());
        assert!(!account(Some("User")).has_completed_profile());
    }

    #[test]
    fn test_profile_update_validation() {
        let valid = ProfileUpdate {
            full_name: Some("Engineering Test User".to_string()),
            avatar_url: Some("https://ik.imagekit.io/souq/avatar.jpg".to_string()),
            bio: Some("Automated System Test".to_string()),
            is_seller: Some(true),
        };
        assert!(valid.validate().is_ok());

        // Absent fields are not validated
        assert!(ProfileUpdate::default().validate().is_ok());

        let invalid = ProfileUpdate {
            full_name: Some("ab".to_string()),
            avatar_url: Some("not-a-url".to_string()),
            bio: Some("x".repeat(161)),
            is_seller: None,
        };
        let issues = invalid.validate().expect_err("three issues");
        assert_eq!(issues.len(), 3);
    }
}
