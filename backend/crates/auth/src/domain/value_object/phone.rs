//! Phone Number Value Object
//!
//! The login identifier for regular users. Accepts E.164-like input:
//! an optional leading `+`, a non-zero first digit, digits only,
//! 10 to 15 characters.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Identifier;

/// Minimum accepted length (characters, including a leading `+`)
const PHONE_MIN_LENGTH: usize = 10;

/// Maximum accepted length
const PHONE_MAX_LENGTH: usize = 15;

/// Phone number value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phone(String);

impl Phone {
    /// Create a new phone number with validation
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let phone = raw.into().trim().to_string();

        if phone.chars().count() < PHONE_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Phone number must be at least {} digits",
                PHONE_MIN_LENGTH
            )));
        }

        if phone.chars().count() > PHONE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Phone number must not exceed {} digits",
                PHONE_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&phone) {
            return Err(AppError::bad_request("Invalid phone number format"));
        }

        Ok(Self(phone))
    }

    /// Optional `+`, then a non-zero digit followed by digits
    fn is_valid_format(phone: &str) -> bool {
        let digits = phone.strip_prefix('+').unwrap_or(phone);

        let mut chars = digits.chars();
        match chars.next() {
            Some(first) if first.is_ascii_digit() && first != '0' => {}
            _ => return false,
        }

        chars.all(|c| c.is_ascii_digit())
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    /// Get the phone number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits, used for default display names
    pub fn last_four(&self) -> &str {
        &self.0[self.0.len().saturating_sub(4)..]
    }
}

impl Identifier for Phone {
    const FIELD: &'static str = "phone";
    const DISPLAY: &'static str = "Phone number";

    fn parse(raw: &str) -> AppResult<Self> {
        Phone::new(raw)
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Phone {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Phone::new(s)
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert!(Phone::new("81234567890").is_ok());
        assert!(Phone::new("+6281234567890").is_ok());
        assert!(Phone::new("  81234567890  ").is_ok()); // trimmed
        assert!(Phone::new("123456789012345").is_ok()); // 15 digits
    }

    #[test]
    fn test_phone_too_short() {
        let err = Phone::new("123456789").unwrap_err();
        assert!(err.message().contains("at least 10"));
    }

    #[test]
    fn test_phone_too_long() {
        let err = Phone::new("1234567890123456").unwrap_err();
        assert!(err.message().contains("not exceed 15"));
    }

    #[test]
    fn test_phone_invalid_format() {
        assert!(Phone::new("6812345678ab").is_err()); // letters
        assert!(Phone::new("++6281234567").is_err()); // double plus
        assert!(Phone::new("6281 345 6789").is_err()); // spaces inside
    }

    #[test]
    fn test_phone_zero_prefix_rejected() {
        // The leading digit must be non-zero, mirroring E.164
        assert!(Phone::new("0812345678901").is_err());
        assert!(Phone::new("+0812345678901").is_err());
    }

    #[test]
    fn test_last_four() {
        let phone = Phone::new("81234567890").unwrap();
        assert_eq!(phone.last_four(), "7890");
    }
}
