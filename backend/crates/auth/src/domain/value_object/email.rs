//! Email Value Object
//!
//! The login identifier for admins. Structural validation only;
//! ownership of the address is established operationally (invite
//! codes), not by confirmation mail.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Identifier;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local-part length
const LOCAL_MAX_LENGTH: usize = 64;

/// Email address value object, stored lowercased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email is required"));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }
        if !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Invalid email format"));
        }

        Ok(Self(email))
    }

    /// Structural checks: one `@`, bounded local part, dotted domain
    /// of alphanumerics/dots/hyphens with no edge punctuation
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > LOCAL_MAX_LENGTH {
            return false;
        }

        let domain_chars_ok = domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

        !domain.is_empty()
            && domain.contains('.')
            && domain_chars_ok
            && !domain.starts_with(['.', '-'])
            && !domain.ends_with(['.', '-'])
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Get the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Identifier for Email {
    const FIELD: &'static str = "email";
    const DISPLAY: &'static str = "Email";

    fn parse(raw: &str) -> AppResult<Self> {
        Email::new(raw)
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_shapes() {
        for raw in [
            "admin@example.com",
            "a.b@example.co.id",
            "user+tag@example.com",
        ] {
            assert!(Email::new(raw).is_ok(), "{raw}");
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in [
            "",
            "adminexample.com",
            "admin@",
            "@example.com",
            "admin@@example.com",
            "admin@example",
            "admin@.example.com",
            "admin@example.com-",
        ] {
            assert!(Email::new(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_lowercases_and_trims() {
        let email = Email::new("  Admin@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "admin@example.com");
    }
}
