//! In-Memory Repository Implementation
//!
//! Backs tests and local development. All records live behind one
//! mutex, which is what makes the duplicate check inside `insert`
//! atomic: no second registration can interleave between the scan and
//! the push.

use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::entity::{admin::Admin, user::User};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{Identifier, email::Email, phone::Phone};
use crate::error::{AuthError, AuthResult};

/// In-memory credential store for both namespaces
#[derive(Clone, Default)]
pub struct MemoryAuthStore {
    inner: Arc<Mutex<Records>>,
}

#[derive(Default)]
struct Records {
    users: Vec<User>,
    admins: Vec<Admin>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        self.inner.lock().expect("credential store lock poisoned")
    }

    /// Number of user records holding the given phone number
    pub fn user_count(&self, phone: &str) -> usize {
        self.records()
            .users
            .iter()
            .filter(|u| u.phone.as_str() == phone)
            .count()
    }

    /// Number of admin records holding the given email
    pub fn admin_count(&self, email: &str) -> usize {
        self.records()
            .admins
            .iter()
            .filter(|a| a.email.as_str() == email)
            .count()
    }
}

impl CredentialRepository<User> for MemoryAuthStore {
    async fn find_by_identifier(&self, identifier: &Phone) -> AuthResult<Option<User>> {
        Ok(self
            .records()
            .users
            .iter()
            .find(|u| u.phone.as_str() == identifier.as_str())
            .cloned())
    }

    async fn find_by_subject(&self, subject: Uuid) -> AuthResult<Option<User>> {
        Ok(self
            .records()
            .users
            .iter()
            .find(|u| u.user_id.as_uuid() == &subject)
            .cloned())
    }

    async fn insert(&self, record: &User) -> AuthResult<()> {
        let mut records = self.records();

        if records
            .users
            .iter()
            .any(|u| u.phone.as_str() == record.phone.as_str())
        {
            return Err(AuthError::AlreadyRegistered(Phone::DISPLAY));
        }

        records.users.push(record.clone());
        Ok(())
    }
}

impl CredentialRepository<Admin> for MemoryAuthStore {
    async fn find_by_identifier(&self, identifier: &Email) -> AuthResult<Option<Admin>> {
        Ok(self
            .records()
            .admins
            .iter()
            .find(|a| a.email.as_str() == identifier.as_str())
            .cloned())
    }

    async fn find_by_subject(&self, subject: Uuid) -> AuthResult<Option<Admin>> {
        Ok(self
            .records()
            .admins
            .iter()
            .find(|a| a.admin_id.as_uuid() == &subject)
            .cloned())
    }

    async fn insert(&self, record: &Admin) -> AuthResult<()> {
        let mut records = self.records();

        if records
            .admins
            .iter()
            .any(|a| a.email.as_str() == record.email.as_str())
        {
            return Err(AuthError::AlreadyRegistered(Email::DISPLAY));
        }

        records.admins.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::password::{PasswordDigest, RawPassword};

    fn user(phone: &str) -> User {
        let raw = RawPassword::for_enrollment("Abc123xx".to_string()).unwrap();
        let digest = PasswordDigest::from_raw(&raw, None).unwrap();
        User::new(Phone::new(phone).unwrap(), None, digest)
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryAuthStore::new();
        let user = user("81234567890");

        store.insert(&user).await.unwrap();

        let found: User = CredentialRepository::<User>::find_by_identifier(
            &store,
            &Phone::new("81234567890").unwrap(),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(found.user_id, user.user_id);

        let by_subject: Option<User> = CredentialRepository::<User>::find_by_subject(
            &store,
            *user.user_id.as_uuid(),
        )
        .await
        .unwrap();
        assert!(by_subject.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = MemoryAuthStore::new();
        store.insert(&user("81234567890")).await.unwrap();

        let result = store.insert(&user("81234567890")).await;
        assert!(matches!(result, Err(AuthError::AlreadyRegistered(_))));
        assert_eq!(store.user_count("81234567890"), 1);
    }

    #[tokio::test]
    async fn test_namespaces_do_not_cross_look_up() {
        let store = MemoryAuthStore::new();
        store.insert(&user("81234567890")).await.unwrap();

        // The same store, queried as the admin namespace, sees nothing
        let admins: Option<Admin> = CredentialRepository::<Admin>::find_by_identifier(
            &store,
            &Email::new("a@x.com").unwrap(),
        )
        .await
        .unwrap();
        assert!(admins.is_none());
    }
}
