//! Principal - the namespace abstraction
//!
//! Users and admins run through one auth stack, parametrized by this
//! trait instead of being duplicated per namespace. A `Principal` binds
//! an identifier kind, a role, the shared namespace constants, and the
//! record constructor.

use kernel::namespace::NamespaceSpec;
use uuid::Uuid;

use crate::domain::entity::{admin::Admin, user::User};
use crate::domain::value_object::{
    Identifier, email::Email, password::PasswordDigest, phone::Phone, role::Role,
};
use crate::error::FieldViolation;

/// An authenticatable record kind
pub trait Principal: Clone + Send + Sync + 'static {
    /// Identifier kind for this namespace (phone or email)
    type Id: Identifier;

    /// Role embedded in issued tokens
    const ROLE: Role;

    /// Shared namespace constants (storage keys, cookie, redirect targets)
    const NAMESPACE: NamespaceSpec;

    /// Whether registration requires an operator-issued invite code
    const INVITE_GATED: bool;

    /// Subject id for token claims
    fn subject(&self) -> Uuid;

    /// Login identifier
    fn identifier(&self) -> &Self::Id;

    /// Stored password digest
    fn digest(&self) -> &PasswordDigest;

    /// Validate the (optional) display name from the registration form
    fn validate_name(name: Option<&str>) -> Option<FieldViolation>;

    /// Construct a fresh record; `validate_name` has already passed
    fn create(identifier: Self::Id, name: Option<String>, digest: PasswordDigest) -> Self;
}

impl Principal for User {
    type Id = Phone;

    const ROLE: Role = Role::User;
    const NAMESPACE: NamespaceSpec = kernel::namespace::USER;
    const INVITE_GATED: bool = false;

    fn subject(&self) -> Uuid {
        *self.user_id.as_uuid()
    }

    fn identifier(&self) -> &Phone {
        &self.phone
    }

    fn digest(&self) -> &PasswordDigest {
        &self.password_hash
    }

    fn validate_name(name: Option<&str>) -> Option<FieldViolation> {
        // Optional; a default is derived from the phone number
        match name {
            Some(n) if n.trim().chars().count() > 50 => Some(FieldViolation::new(
                "name",
                "Name must not exceed 50 characters",
            )),
            _ => None,
        }
    }

    fn create(identifier: Phone, name: Option<String>, digest: PasswordDigest) -> Self {
        User::new(identifier, name, digest)
    }
}

impl Principal for Admin {
    type Id = Email;

    const ROLE: Role = Role::Admin;
    const NAMESPACE: NamespaceSpec = kernel::namespace::ADMIN;
    const INVITE_GATED: bool = true;

    fn subject(&self) -> Uuid {
        *self.admin_id.as_uuid()
    }

    fn identifier(&self) -> &Email {
        &self.email
    }

    fn digest(&self) -> &PasswordDigest {
        &self.password_hash
    }

    fn validate_name(name: Option<&str>) -> Option<FieldViolation> {
        let name = name.map(str::trim).unwrap_or_default();

        if name.is_empty() {
            return Some(FieldViolation::new("name", "Name is required"));
        }
        if name.chars().count() > 50 {
            return Some(FieldViolation::new(
                "name",
                "Name must not exceed 50 characters",
            ));
        }
        None
    }

    fn create(identifier: Email, name: Option<String>, digest: PasswordDigest) -> Self {
        Admin::new(identifier, name.unwrap_or_default().trim().to_string(), digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_is_optional() {
        assert!(User::validate_name(None).is_none());
        assert!(User::validate_name(Some("Andi")).is_none());
        assert!(User::validate_name(Some(&"x".repeat(51))).is_some());
    }

    #[test]
    fn test_admin_name_is_required() {
        assert!(Admin::validate_name(None).is_some());
        assert!(Admin::validate_name(Some(" ")).is_some());
        assert!(Admin::validate_name(Some("A")).is_none());
        assert!(Admin::validate_name(Some(&"x".repeat(51))).is_some());
    }

    #[test]
    fn test_namespaces_are_bound_to_roles() {
        assert_eq!(User::NAMESPACE.role_code, User::ROLE.code());
        assert_eq!(Admin::NAMESPACE.role_code, Admin::ROLE.code());
    }
}
