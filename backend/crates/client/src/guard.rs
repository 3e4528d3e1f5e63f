//! Route Guard
//!
//! The component-level access check, for sessions the request edge
//! cannot see (client-local storage). One guard instance covers one
//! mounted view.
//!
//! States per mount: `Checking` until the first evaluation, then
//! either `Authorized` (render the wrapped content) or `Redirecting`
//! (never render it). `Redirecting` is terminal for the mount; a fresh
//! mount starts over at `Checking`. Session bus events trigger a
//! re-check, so a logout in another tab pulls an `Authorized` view
//! into `Redirecting`.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;

use crate::session::SessionManager;

/// What the guard enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Protected view: require a live session, else redirect to login
    RequireAuth,
    /// Auth form: bounce visitors who already have a session
    RedirectAuthenticated,
}

/// Guard lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Mounted, check not yet run; show a transient loading state
    Checking,
    /// Check passed; the wrapped content may render
    Authorized,
    /// Check failed; a redirect to the given location is in flight
    Redirecting(String),
}

/// Per-view access-control state machine
pub struct RouteGuard {
    session: Arc<SessionManager>,
    policy: GuardPolicy,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionManager>, policy: GuardPolicy) -> Self {
        Self {
            session,
            policy,
            state: GuardState::Checking,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Whether the wrapped content may render right now
    ///
    /// Only `Authorized` renders; `Checking` and `Redirecting` both
    /// show transient screens so protected content never flashes.
    pub fn should_render(&self) -> bool {
        self.state == GuardState::Authorized
    }

    /// Run the access check for a freshly mounted view
    pub fn mount(&mut self, current_path: &str) -> &GuardState {
        self.state = self.evaluate(current_path);
        &self.state
    }

    /// Re-check after a session bus event
    ///
    /// `Redirecting` is terminal: once a redirect is in flight, later
    /// events cannot resurrect the mount.
    pub fn on_session_event(&mut self, current_path: &str) -> &GuardState {
        if matches!(self.state, GuardState::Redirecting(_)) {
            return &self.state;
        }
        self.state = self.evaluate(current_path);
        &self.state
    }

    fn evaluate(&self, current_path: &str) -> GuardState {
        let authenticated = self.session.is_authenticated();
        let namespace = self.session.namespace();

        match self.policy {
            GuardPolicy::RequireAuth => {
                if authenticated {
                    GuardState::Authorized
                } else {
                    let target = format!(
                        "{}?redirect={}",
                        namespace.login_path,
                        utf8_percent_encode(current_path, NON_ALPHANUMERIC)
                    );
                    GuardState::Redirecting(target)
                }
            }
            GuardPolicy::RedirectAuthenticated => {
                if authenticated {
                    GuardState::Redirecting(namespace.landing_path.to_string())
                } else {
                    GuardState::Authorized
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStorage};
    use kernel::namespace::{ADMIN, USER};
    use platform::token::{Claims, TokenCodec};
    use serde_json::json;
    use std::time::Duration;
    use uuid::Uuid;

    fn session_with_token(role: &str) -> (Arc<SessionManager>, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let spec = if role == "admin" { &ADMIN } else { &USER };
        let session = Arc::new(SessionManager::new(store.clone(), spec));

        let claims = Claims::new(Uuid::new_v4(), "81234567890", role, Duration::from_secs(60));
        let token = TokenCodec::new([1u8; 32]).issue(&claims);
        session.set_session(&token, &json!({}));

        (session, store)
    }

    fn anonymous_session() -> Arc<SessionManager> {
        Arc::new(SessionManager::new(Arc::new(MemoryStorage::new()), &USER))
    }

    #[test]
    fn test_starts_checking_and_renders_nothing() {
        let guard = RouteGuard::new(anonymous_session(), GuardPolicy::RequireAuth);
        assert_eq!(guard.state(), &GuardState::Checking);
        assert!(!guard.should_render());
    }

    #[test]
    fn test_unauthenticated_mount_goes_to_redirecting() {
        let mut guard = RouteGuard::new(anonymous_session(), GuardPolicy::RequireAuth);

        let state = guard.mount("/user-profile").clone();

        let GuardState::Redirecting(target) = state else {
            panic!("expected redirect");
        };
        assert!(target.starts_with("/auth/login?redirect="));
        // Protected children never rendered at any point
        assert!(!guard.should_render());
    }

    #[test]
    fn test_authenticated_mount_authorizes() {
        let (session, _) = session_with_token("user");
        let mut guard = RouteGuard::new(session, GuardPolicy::RequireAuth);

        assert_eq!(guard.mount("/user-profile"), &GuardState::Authorized);
        assert!(guard.should_render());
    }

    #[test]
    fn test_auth_form_bounces_authenticated_visitor() {
        let (session, _) = session_with_token("user");
        let mut guard = RouteGuard::new(session, GuardPolicy::RedirectAuthenticated);

        let state = guard.mount("/auth/login").clone();
        assert_eq!(state, GuardState::Redirecting("/".to_string()));
    }

    #[test]
    fn test_auth_form_renders_for_anonymous_visitor() {
        let mut guard = RouteGuard::new(anonymous_session(), GuardPolicy::RedirectAuthenticated);
        assert_eq!(guard.mount("/auth/login"), &GuardState::Authorized);
    }

    #[test]
    fn test_admin_guard_redirects_to_admin_login() {
        let session = Arc::new(SessionManager::new(
            Arc::new(MemoryStorage::new()),
            &ADMIN,
        ));
        let mut guard = RouteGuard::new(session, GuardPolicy::RequireAuth);

        let GuardState::Redirecting(target) = guard.mount("/admin").clone() else {
            panic!("expected redirect");
        };
        assert!(target.starts_with("/a/login?redirect="));
    }

    #[test]
    fn test_cross_tab_logout_revokes_authorized_view() {
        let (session, _) = session_with_token("user");
        let mut guard = RouteGuard::new(session.clone(), GuardPolicy::RequireAuth);

        assert_eq!(guard.mount("/user-profile"), &GuardState::Authorized);

        // Another tab clears the session; the bus event triggers a re-check
        session.clear();
        let state = guard.on_session_event("/user-profile").clone();
        assert!(matches!(state, GuardState::Redirecting(_)));
    }

    #[test]
    fn test_redirecting_is_terminal_for_the_mount() {
        let session = anonymous_session();
        let mut guard = RouteGuard::new(session.clone(), GuardPolicy::RequireAuth);

        let first = guard.mount("/user-profile").clone();
        assert!(matches!(first, GuardState::Redirecting(_)));

        // A login landing mid-redirect does not resurrect this mount
        let claims = Claims::new(Uuid::new_v4(), "81234567890", "user", Duration::from_secs(60));
        let token = TokenCodec::new([1u8; 32]).issue(&claims);
        session.set_session(&token, &json!({}));

        assert_eq!(guard.on_session_event("/user-profile"), &first);

        // A fresh mount re-enters the machine and authorizes
        let mut remounted = RouteGuard::new(session, GuardPolicy::RequireAuth);
        assert_eq!(remounted.mount("/user-profile"), &GuardState::Authorized);
    }
}
