//! Address models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use souq_core::{AccountId, AddressId};

use crate::error::ValidationIssue;

/// A delivery address belonging to exactly one account.
///
/// At most one address per account carries `is_default = true`; exclusivity
/// is enforced by the repository (clear-then-insert in one transaction), not
/// by a database constraint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Address {
    pub id: AddressId,
    pub account_id: AccountId,
    pub governorate: String,
    pub city_district: String,
    pub street_address: String,
    pub nearest_landmark: String,
    pub lat_long: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// New address payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    pub governorate: String,
    pub city_district: String,
    pub street_address: String,
    pub nearest_landmark: String,
    #[serde(default)]
    pub lat_long: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl NewAddress {
    /// Validate field constraints.
    ///
    /// # Errors
    ///
    /// Returns the list of field issues when any constraint is violated.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if self.governorate.trim().is_empty() {
            issues.push(ValidationIssue::new("governorate", "must not be empty"));
        }
        if self.city_district.len() < 2 {
            issues.push(ValidationIssue::new(
                "city_district",
                "must be at least 2 characters",
            ));
        }
        if self.street_address.len() < 5 {
            issues.push(ValidationIssue::new(
                "street_address",
                "must be at least 5 characters",
            ));
        }
        if self.nearest_landmark.len() < 2 {
            issues.push(ValidationIssue::new(
                "nearest_landmark",
                "must be at least 2 characters",
            ));
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_address_validation() {
        let valid = NewAddress {
            governorate: "Babylon".to_string(),
            city_district: "Hillah".to_string(),
            street_address: "Engineer's District".to_string(),
            nearest_landmark: "University of Babylon".to_string(),
            lat_long: None,
            is_default: true,
        };
        assert!(valid.validate().is_ok());

        let invalid = NewAddress {
            governorate: "  ".to_string(),
            city_district: "H".to_string(),
            street_address: "st".to_string(),
            nearest_landmark: "x".to_string(),
            lat_long: None,
            is_default: false,
        };
        let issues = invalid.validate().expect_err("four issues");
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_new_address_defaults() {
        let body: NewAddress = serde_json::from_str(
            r#"{
                "governorate": "Babylon",
                "city_district": "Hillah",
                "street_address": "Engineer's District",
                "nearest_landmark": "University of Babylon"
            }"#,
        )
        .expect("deserializes");
        assert!(!body.is_default);
        assert!(body.lat_long.is_none());
    }
}
