//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - User signup/signin with phone number + password
//! - Admin signup/signin with email + password (invite-gated signup)
//! - One parametrized auth stack for both namespaces ([`domain::Principal`])
//! - Signed bearer tokens (7-day user / 24-hour admin TTL)
//! - Edge route guard with per-namespace redirect targets
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Login failures are indistinguishable (unknown identifier vs wrong
//!   password)
//! - Tokens expire hard at `iat + ttl`; there is no renewal
//! - A user token never satisfies an admin guard and vice versa

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult, FieldViolation};
pub use infra::memory::MemoryAuthStore;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
