//! Current User Use Case
//!
//! Resolves verified token claims back to the stored record.

use std::marker::PhantomData;
use std::sync::Arc;

use platform::token::Claims;

use crate::domain::principal::Principal;
use crate::domain::repository::CredentialRepository;
use crate::error::{AuthError, AuthResult};

/// Current user use case, one instance per namespace
pub struct CurrentUserUseCase<P, R>
where
    P: Principal,
    R: CredentialRepository<P>,
{
    repo: Arc<R>,
    _namespace: PhantomData<P>,
}

impl<P, R> CurrentUserUseCase<P, R>
where
    P: Principal,
    R: CredentialRepository<P>,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            _namespace: PhantomData,
        }
    }

    /// Look up the record behind already-verified claims
    ///
    /// The claims must come from `TokenCodec::verify`, never `decode`.
    pub async fn execute(&self, claims: &Claims) -> AuthResult<P> {
        if claims.role != P::ROLE.code() {
            return Err(AuthError::Forbidden);
        }

        self.repo
            .find_by_subject(claims.sub)
            .await?
            .ok_or(AuthError::TokenInvalid)
    }
}
