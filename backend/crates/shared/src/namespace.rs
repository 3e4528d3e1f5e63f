//! Auth Namespace Table
//!
//! The platform runs two parallel auth stacks: regular users (phone login)
//! and admins (email login). Both the server (cookies, redirects) and the
//! client (storage keys, login routes) must agree on the per-namespace
//! constants, so they live here in one place.

/// Per-namespace constants shared by server and client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceSpec {
    /// Role code embedded in token claims ("user" / "admin")
    pub role_code: &'static str,
    /// Client-local storage key for the bearer token
    pub token_key: &'static str,
    /// Client-local storage key for the serialized user view
    pub user_key: &'static str,
    /// Cookie name used by the edge guard
    pub cookie_name: &'static str,
    /// Login entry point for this namespace
    pub login_path: &'static str,
    /// Landing page after successful authentication
    pub landing_path: &'static str,
}

/// Regular user namespace (phone + password, 7-day tokens)
pub const USER: NamespaceSpec = NamespaceSpec {
    role_code: "user",
    token_key: "auth_token",
    user_key: "auth_user",
    cookie_name: "auth_token",
    login_path: "/auth/login",
    landing_path: "/",
};

/// Admin namespace (email + password, 24-hour tokens)
pub const ADMIN: NamespaceSpec = NamespaceSpec {
    role_code: "admin",
    token_key: "admin_token",
    user_key: "admin_user",
    cookie_name: "admin_token",
    login_path: "/a/login",
    landing_path: "/admin",
};
