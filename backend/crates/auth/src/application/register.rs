//! Register Use Case
//!
//! Creates a new account in one namespace and issues its first token.

use std::marker::PhantomData;
use std::sync::Arc;

use platform::crypto::constant_time_eq;
use platform::token::Claims;

use crate::application::config::AuthConfig;
use crate::domain::principal::Principal;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{Identifier, password::RawPassword, password::PasswordDigest};
use crate::error::{AuthError, AuthResult, FieldViolation};

/// Register input
pub struct RegisterInput {
    pub identifier: String,
    pub password: String,
    pub name: Option<String>,
    /// Required when the namespace is invite-gated (admins)
    pub invite_code: Option<String>,
}

/// Result of a successful register or login
#[derive(Debug)]
pub struct AuthPayload<P> {
    pub record: P,
    pub token: String,
    pub claims: Claims,
}

/// Register use case, one instance per namespace
pub struct RegisterUseCase<P, R>
where
    P: Principal,
    R: CredentialRepository<P>,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    _namespace: PhantomData<P>,
}

impl<P, R> RegisterUseCase<P, R>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthPayload<P>> {
        // Authorization precedes validation: invite-gated namespaces
        // reject outsiders before looking at the payload.
        if P::INVITE_GATED {
            self.check_invite(input.invite_code.as_deref())?;
        }

        // Collect every violation; the form renders them all at once.
        let mut violations = Vec::new();

        let identifier = match P::Id::parse(&input.identifier) {
            Ok(id) => Some(id),
            Err(e) => {
                violations.push(FieldViolation::new(P::Id::FIELD, e.message()));
                None
            }
        };

        let password = match RawPassword::for_enrollment(input.password) {
            Ok(pw) => Some(pw),
            Err(e) => {
                violations.push(FieldViolation::new("password", e.message()));
                None
            }
        };

        if let Some(violation) = P::validate_name(input.name.as_deref()) {
            violations.push(violation);
        }

        if !violations.is_empty() {
            return Err(AuthError::Validation(violations));
        }

        let (Some(identifier), Some(password)) = (identifier, password) else {
            return Err(AuthError::Internal(
                "validation passed with missing fields".to_string(),
            ));
        };

        // Friendly 409 for the common case; the insert below remains
        // the authority under concurrent registration.
        if self.repo.find_by_identifier(&identifier).await?.is_some() {
            return Err(AuthError::AlreadyRegistered(P::Id::DISPLAY));
        }

        let digest = PasswordDigest::from_raw(&password, self.config.pepper())?;
        let record = P::create(identifier, input.name, digest);

        self.repo.insert(&record).await?;

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
            "Account registered"
        );

        Ok(AuthPayload {
            record,
            token,
            claims,
        })
    }

    /// Compare the presented invite code against configuration
    ///
    /// No configured code means the namespace is closed for
    /// registration, not open.
    fn check_invite(&self, provided: Option<&str>) -> AuthResult<()> {
        let Some(expected) = self.config.admin_invite_code.as_deref() else {
            return Err(AuthError::Forbidden);
        };
        let Some(provided) = provided else {
            return Err(AuthError::Forbidden);
        };
        if !constant_time_eq(expected.as_bytes(), provided.as_bytes()) {
            return Err(AuthError::Forbidden);
        }
        Ok(())
    }
}
