//! Login Use Case
//!
//! Authenticates an existing account and issues a fresh token.
//! An unknown identifier and a wrong password produce the identical
//! failure; nothing observable distinguishes them.

use std::marker::PhantomData;
use std::sync::Arc;

use platform::token::Claims;

use crate::application::config::AuthConfig;
use crate::application::register::AuthPayload;
use crate::domain::principal::Principal;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{Identifier, password::RawPassword};
use crate::error::{AuthError, AuthResult, FieldViolation};

/// Login input
pub struct LoginInput {
    pub identifier: String,
    pub password: String,
}

/// Login use case, one instance per namespace
pub struct LoginUseCase<P, R>
where
    P: Principal,
    R: CredentialRepository<P>,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    _namespace: PhantomData<P>,
}

impl<P, R> LoginUseCase<P, R>
where
    P: Principal,
    R: CredentialRepository<P>,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            config,
            _namespace: PhantomData,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthPayload<P>> {
        // Shape validation only; composition is an enrollment concern
        let mut violations = Vec::new();

        let identifier = match P::Id::parse(&input.identifier) {
            Ok(id) => Some(id),
            Err(e) => {
                violations.push(FieldViolation::new(P::Id::FIELD, e.message()));
                None
            }
        };

        let password = match RawPassword::for_login(input.password) {
            Ok(pw) => Some(pw),
            Err(e) => {
                violations.push(FieldViolation::new("password", e.message()));
                None
            }
        };

        if !violations.is_empty() {
            return Err(AuthError::Validation(violations));
        }

        let (Some(identifier), Some(password)) = (identifier, password) else {
            return Err(AuthError::Internal(
                "validation passed with missing fields".to_string(),
            ));
        };

        let record = self
            .repo
            .find_by_identifier(&identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !record.digest().verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::new(
            record.subject(),
            record.identifier().as_str(),
            P::ROLE.code(),
            self.config.token_ttl(P::ROLE),
        );
        let token = self.config.codec().issue(&claims);

        tracing::info!(
            subject = %record.subject(),
            role = %P::ROLE,
            "Signed in"
        );

        Ok(AuthPayload {
            record,
            token,
            claims,
        })
    }
}
