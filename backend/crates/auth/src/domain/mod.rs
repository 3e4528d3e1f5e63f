//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod principal;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{admin::Admin, user::User};
pub use principal::Principal;
pub use repository::CredentialRepository;
