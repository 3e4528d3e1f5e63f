//! Session Manager
//!
//! Persists `{token, user view}` under the namespace's storage keys
//! and answers every `is_authenticated` query from the store, never
//! from a cached flag. Mutations are announced on an explicit pub/sub
//! bus, which is also the cross-tab synchronization signal: other tabs
//! (or guards in this one) re-check on receipt instead of trusting
//! whatever they last saw.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::broadcast;

use kernel::namespace::NamespaceSpec;
use platform::token::TokenCodec;

use crate::storage::KeyValueStore;

/// Something that can change the current location
///
/// The session layer never touches a window object directly; logout
/// and forced redirects go through this seam.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Session mutation events, published on every write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was stored (login/register completed)
    Updated,
    /// The session was removed (logout or forced clear)
    Cleared,
}

/// Namespace-bound session persistence
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    spec: &'static NamespaceSpec,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, spec: &'static NamespaceSpec) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store,
            spec,
            events,
        }
    }

    /// The namespace this manager serves
    pub fn namespace(&self) -> &'static NamespaceSpec {
        self.spec
    }

    /// Subscribe to session mutations (the cross-tab signal)
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Persist a session
    ///
    /// Single write path for both entries. The user view is written
    /// before the token, so any reader that can see the token can also
    /// see the user; there is no observable token-without-user state.
    pub fn set_session<T: Serialize>(&self, token: &str, user: &T) {
        let user_json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Refusing to store unserializable user view");
                return;
            }
        };

        self.store.set(self.spec.user_key, &user_json);
        self.store.set(self.spec.token_key, token);

        let _ = self.events.send(SessionEvent::Updated);
    }

    /// Stored token, if any
    pub fn token(&self) -> Option<String> {
        self.store.get(self.spec.token_key)
    }

    /// Stored user view, if present and parseable
    ///
    /// Parse failures read as `None`; this never panics or errors.
    pub fn user<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.store.get(self.spec.user_key)?;
        serde_json::from_str(&raw).ok()
    }

    /// Whether a live session exists
    ///
    /// Re-reads the store and re-decodes the token on every call: the
    /// presence of a stored blob is not validity, and a flag cached at
    /// login time would outlive a cross-tab logout or token expiry.
    /// The claims must also carry this namespace's role; a foreign
    /// token copied into the wrong slot never counts. Uses the local
    /// decode (no signature check), which is fine for UI gating and
    /// never authoritative for the server.
    pub fn is_authenticated(&self) -> bool {
        match self.token().and_then(|t| TokenCodec::decode(&t)) {
            Some(claims) => claims.role == self.spec.role_code && !claims.is_expired(),
            None => false,
        }
    }

    /// Remove both entries and announce the change
    ///
    /// The token goes first so authentication checks fail from the
    /// instant the clear begins.
    pub fn clear(&self) {
        self.store.remove(self.spec.token_key);
        self.store.remove(self.spec.user_key);

        let _ = self.events.send(SessionEvent::Cleared);
    }

    /// Clear the session and return to this namespace's login page
    pub fn logout(&self, navigator: &dyn Navigator) {
        self.clear();
        navigator.navigate(self.spec.login_path);
    }
}
