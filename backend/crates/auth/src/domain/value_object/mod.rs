//! Value Object Module

pub mod email;
pub mod password;
pub mod phone;
pub mod role;

use kernel::error::app_error::AppResult;

/// A login identifier: phone for regular users, email for admins
///
/// Each namespace has exactly one identifier kind; parsing produces
/// user-facing messages suitable for field-level form errors.
pub trait Identifier: Clone + std::fmt::Display + Send + Sync + Sized + 'static {
    /// Request DTO field name ("phone" / "email")
    const FIELD: &'static str;

    /// Display name used in conflict messages ("Phone number" / "Email")
    const DISPLAY: &'static str;

    /// Parse and validate raw user input
    fn parse(raw: &str) -> AppResult<Self>;

    /// The canonical string form (what gets stored and embedded in tokens)
    fn as_str(&self) -> &str;
}
