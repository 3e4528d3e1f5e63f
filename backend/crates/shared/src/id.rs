//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities. `Id<markers::User>` and
//! `Id<markers::Admin>` are distinct types, so a user id can never be
//! handed to an admin lookup by accident.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic typed ID wrapper over a UUID v4
pub struct Id<T>(Uuid, PhantomData<T>);

impl<T> Id<T> {
    /// Fresh random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4(), PhantomData)
    }

    /// Wrap an existing UUID (from storage or a token)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, PhantomData)
    }

    /// Borrow the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Unwrap into the underlying UUID
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

// Manual impls: derives would demand T: Clone etc., but the marker is
// phantom.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.0
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for regular user (member) IDs
    pub struct User;

    /// Marker for admin IDs
    pub struct Admin;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type AdminId = Id<markers::Admin>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_v4_and_distinct() {
        let a: UserId = Id::new();
        let b: UserId = Id::new();
        assert_eq!(a.as_uuid().get_version_num(), 4);
        assert_ne!(a, b);
    }

    #[test]
    fn test_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id: AdminId = uuid.into();
        assert_eq!(id.as_uuid(), &uuid);
        assert_eq!(Uuid::from(id), uuid);
    }
}
