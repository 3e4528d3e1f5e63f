//! User Entity
//!
//! A regular member who books pitches. The login identifier is the
//! phone number; the booking subsystem owns the two counters and only
//! ever mutates them through its own flows.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{password::PasswordDigest, phone::Phone};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Phone number (unique, for login)
    pub phone: Phone,
    /// Display name
    pub name: String,
    /// Hashed password; never leaves the auth layer
    pub password_hash: PasswordDigest,
    /// Matches played (owned by the booking subsystem)
    pub games_played: i32,
    /// Discount vouchers earned (owned by the booking subsystem)
    pub vouchers: i32,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    ///
    /// When no name is given, a default is derived from the last four
    /// digits of the phone number.
    pub fn new(phone: Phone, name: Option<String>, password_hash: PasswordDigest) -> Self {
        let name = match name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => format!("User {}", phone.last_four()),
        };

        Self {
            user_id: UserId::new(),
            phone,
            name,
            password_hash,
            games_played: 0,
            vouchers: 0,
            created_at: Utc::now(),
        }
    }
}
