//! Status and tag enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Product availability status.
///
/// Stored as text; new listings always start as [`Self::InStock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    InStock,
    Reserved,
    SoldOut,
}

impl AvailabilityStatus {
    /// The wire/database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::Reserved => "reserved",
            Self::SoldOut => "sold_out",
        }
    }
}

/// Purpose tag attached to a one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpPurpose {
    #[default]
    PhoneNumberVerification,
}

impl OtpPurpose {
    /// The wire/database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhoneNumberVerification => "PHONE_NUMBER_VERIFICATION",
        }
    }
}

/// Destination purpose for an uploaded image.
///
/// Selects the folder on the image host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImagePurpose {
    Avatar,
    Product,
    Banner,
    #[default]
    Others,
}

impl ImagePurpose {
    /// The wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::Product => "product",
            Self::Banner => "banner",
            Self::Others => "others",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_serde_matches_as_str() {
        let json = serde_json::to_string(&AvailabilityStatus::InStock).expect("serializes");
        assert_eq!(json, "\"in_stock\"");
        assert_eq!(AvailabilityStatus::default().as_str(), "in_stock");
    }

    #[test]
    fn test_otp_purpose_wire_format() {
        let json = serde_json::to_string(&OtpPurpose::PhoneNumberVerification).expect("serializes");
        assert_eq!(json, "\"PHONE_NUMBER_VERIFICATION\"");
    }

    #[test]
    fn test_image_purpose_deserializes_lowercase() {
        let purpose: ImagePurpose = serde_json::from_str("\"avatar\"").expect("deserializes");
        assert_eq!(purpose, ImagePurpose::Avatar);
        assert_eq!(ImagePurpose::default(), ImagePurpose::Others);
    }
}
