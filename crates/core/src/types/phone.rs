//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("phone number must be at least {min} digits")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("phone number must be at most {max} digits")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a non-digit character.
    #[error("phone number may only contain digits")]
    InvalidCharacter,
}

/// A subscriber phone number in national format (digits only, no dial prefix).
///
/// The dial prefix is a delivery concern and is prepended by the SMS gateway
/// client, never stored.
///
/// ## Constraints
///
/// - Length: 10-15 digits
/// - ASCII digits only
///
/// ## Examples
///
/// ```
/// use souq_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("7886474987").is_ok());
///
/// assert!(PhoneNumber::parse("").is_err());          // empty
/// assert!(PhoneNumber::parse("12345").is_err());     // too short
/// assert!(PhoneNumber::parse("+9647886474").is_err()); // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_LENGTH: usize = 10;

    /// Maximum number of digits (ITU-T E.164 limit).
    pub const MAX_LENGTH: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, shorter than 10 digits,
    /// longer than 15 digits, or contains a non-digit character.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneNumberError::InvalidCharacter);
        }

        if s.len() < Self::MIN_LENGTH {
            return Err(PhoneNumberError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(PhoneNumberError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let phone = PhoneNumber::parse("7886474987").expect("valid phone");
        assert_eq!(phone.as_str(), "7886474987");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            PhoneNumber::parse(""),
            Err(PhoneNumberError::Empty)
        ));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            PhoneNumber::parse("123456789"),
            Err(PhoneNumberError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            PhoneNumber::parse("1234567890123456"),
            Err(PhoneNumberError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_plus_prefix() {
        assert!(matches!(
            PhoneNumber::parse("+9647886474987"),
            Err(PhoneNumberError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_rejects_spaces() {
        assert!(PhoneNumber::parse("788 647 4987").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let phone = PhoneNumber::parse("7886474987").expect("valid phone");
        let json = serde_json::to_string(&phone).expect("serializes");
        assert_eq!(json, "\"7886474987\"");
    }
}
