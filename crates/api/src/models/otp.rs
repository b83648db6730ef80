//! One-time code model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use souq_core::OtpId;

/// An ephemeral verification code keyed by phone number.
///
/// At most one row exists per identifier (unique key); the row is deleted on
/// successful verification.
#[derive(Debug, Clone, FromRow)]
pub struct OtpCode {
    pub id: OtpId,
    /// The phone number this code was issued for
    pub identifier: String,
    /// 6-digit numeric code
    pub code: String,
    /// Purpose tag, e.g. `PHONE_NUMBER_VERIFICATION`
    pub purpose: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OtpCode {
    /// Whether the code's expiry lies in the past.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn code(expires_at: DateTime<Utc>) -> OtpCode {
        OtpCode {
            id: OtpId::new(Uuid::new_v4()),
            identifier: "7886474987".to_string(),
            code: "123456".to_string(),
            purpose: "PHONE_NUMBER_VERIFICATION".to_string(),
            expires_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        assert!(code(now - Duration::seconds(1)).is_expired(now));
        assert!(!code(now + Duration::minutes(10)).is_expired(now));
    }
}
