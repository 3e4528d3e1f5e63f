//! Admin Entity
//!
//! Facility staff. Lives in its own table; the user and admin
//! namespaces are never cross-looked-up.

use chrono::{DateTime, Utc};
use kernel::id::AdminId;

use crate::domain::value_object::{email::Email, password::PasswordDigest, role::Role};

/// Admin entity
#[derive(Debug, Clone)]
pub struct Admin {
    /// Internal UUID identifier
    pub admin_id: AdminId,
    /// Email address (unique, for login)
    pub email: Email,
    /// Display name
    pub name: String,
    /// Fixed role
    pub role: Role,
    /// Hashed password; never leaves the auth layer
    pub password_hash: PasswordDigest,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Admin {
    /// Create a new admin
    pub fn new(email: Email, name: String, password_hash: PasswordDigest) -> Self {
        Self {
            admin_id: AdminId::new(),
            email,
            name,
            role: Role::Admin,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::password::RawPassword;

    #[test]
    fn test_admin_role_is_fixed() {
        let raw = RawPassword::for_enrollment("Abc123xx".to_string()).unwrap();
        let digest = PasswordDigest::from_raw(&raw, None).unwrap();
        let admin = Admin::new(
            Email::new("a@x.com").unwrap(),
            "A".to_string(),
            digest,
        );
        assert_eq!(admin.role, Role::Admin);
    }
}
