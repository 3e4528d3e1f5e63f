//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use uuid::Uuid;

use crate::domain::principal::Principal;
use crate::error::AuthResult;

/// Credential store for one auth namespace
///
/// One implementation typically serves both namespaces
/// (`CredentialRepository<User> + CredentialRepository<Admin>`), each
/// against its own table or keyspace.
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository<P: Principal> {
    /// Find a record by its login identifier
    async fn find_by_identifier(&self, identifier: &P::Id) -> AuthResult<Option<P>>;

    /// Find a record by its subject id
    async fn find_by_subject(&self, subject: Uuid) -> AuthResult<Option<P>>;

    /// Insert a new record
    ///
    /// The uniqueness check and the insert must be atomic per
    /// identifier: of two concurrent registrations, exactly one wins
    /// and the loser fails with `AlreadyRegistered`. Implementations
    /// enforce this at the store (unique index, single lock), never
    /// with a check-then-insert in application code.
    async fn insert(&self, record: &P) -> AuthResult<()>;
}
