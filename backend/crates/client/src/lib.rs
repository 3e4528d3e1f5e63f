//! Client Crate - Session & Guard Layer
//!
//! The browser-side half of the auth stack, kept UI-free so any
//! frontend can drive it:
//! - `storage` - the key/value contract client-local persistence runs on
//! - `session` - session persistence, cross-tab event bus, logout
//! - `guard` - the per-view access-control state machine
//! - `api` - HTTP transport for the auth endpoints, with cancellation
//! - `error_bridge` - failure classification and notification routing
//!
//! Everything is namespaced: a user session and an admin session use
//! distinct storage keys, login routes, and token TTLs, and neither
//! ever satisfies the other's guard.

pub mod api;
pub mod error_bridge;
pub mod guard;
pub mod session;
pub mod storage;

pub use api::{
    ApiFailure, AuthTransport, FieldMessage, HttpAuthApi, RequestScope, SessionPayload, SignUpForm,
    sign_in, sign_up,
};
pub use error_bridge::{ErrorBridge, FailureKind, Notification, NotificationLevel, Notifier};
pub use guard::{GuardPolicy, GuardState, RouteGuard};
pub use session::{Navigator, SessionEvent, SessionManager};
pub use storage::{KeyValueStore, MemoryStorage};
