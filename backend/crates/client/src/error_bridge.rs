//! Error/Notification Bridge
//!
//! Classifies every failed auth API call into a closed set of kinds
//! and routes the user-visible consequences:
//! - field-level validation messages go back to the form, with no
//!   toast on top of them
//! - `Unauthorized`/`Forbidden` force a session clear and a delayed
//!   redirect to the namespace login page, after the notification has
//!   had time to be read
//! - everything else raises a toast and leaves the session alone
//!
//! The classification is total: any failure lands in exactly one kind,
//! with `Unknown` as the fallback.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiFailure, FieldMessage};
use crate::session::{Navigator, SessionManager};

/// Closed failure taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport-level failure (no HTTP response, includes timeouts)
    Network,
    /// 400 with (possibly empty) field messages
    Validation(Vec<FieldMessage>),
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 429
    RateLimited,
    /// 5xx
    Server,
    /// Anything else
    Unknown,
}

/// Map a failure to its kind; total over all inputs
pub fn classify(failure: &ApiFailure) -> FailureKind {
    match failure {
        ApiFailure::Transport { .. } => FailureKind::Network,
        ApiFailure::Status {
            status, details, ..
        } => match status {
            400 => FailureKind::Validation(details.clone()),
            401 => FailureKind::Unauthorized,
            403 => FailureKind::Forbidden,
            404 => FailureKind::NotFound,
            429 => FailureKind::RateLimited,
            s if *s >= 500 => FailureKind::Server,
            _ => FailureKind::Unknown,
        },
    }
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
    Warning,
}

/// A toast notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Toast sink; the UI shell implements this
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Routes classified failures to their user-visible consequences
pub struct ErrorBridge {
    session: Arc<SessionManager>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
}

impl ErrorBridge {
    pub fn new(
        session: Arc<SessionManager>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
            redirect_delay: Duration::from_secs(2),
        }
    }

    /// Override the forced-logout redirect delay
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Classify and react; returns the kind so forms can branch on it
    ///
    /// Must run inside a tokio runtime (the delayed redirect is a
    /// spawned task).
    pub fn handle(&self, failure: &ApiFailure) -> FailureKind {
        let kind = classify(failure);

        match &kind {
            FailureKind::Validation(fields) if !fields.is_empty() => {
                // Inline field messages only; a toast on top would be
                // duplicate noise.
            }
            FailureKind::Validation(_) => {
                self.notifier.notify(Notification::error(
                    "Invalid request",
                    "Please check your input and try again.",
                ));
            }
            FailureKind::Unauthorized | FailureKind::Forbidden => {
                self.force_logout();
            }
            FailureKind::Network => {
                self.notifier.notify(Notification::error(
                    "Connection problem",
                    "Unable to connect to the server. Please check your internet connection and try again.",
                ));
            }
            FailureKind::NotFound => {
                self.notifier.notify(Notification::error(
                    "Not found",
                    "The requested information could not be found.",
                ));
            }
            FailureKind::RateLimited => {
                self.notifier.notify(Notification::error(
                    "Slow down",
                    "You're making requests too quickly. Please wait a moment and try again.",
                ));
            }
            FailureKind::Server => {
                self.notifier.notify(Notification::error(
                    "Server error",
                    "Our servers are experiencing issues. Please try again in a few minutes.",
                ));
            }
            FailureKind::Unknown => {
                self.notifier.notify(Notification::error(
                    "Something went wrong",
                    "An unexpected error occurred. Please try again.",
                ));
            }
        }

        kind
    }

    /// Session is gone or insufficient: clear it, tell the user, and
    /// navigate to login once the message has been readable
    fn force_logout(&self) {
        self.notifier.notify(Notification::error(
            "Session expired",
            "Your session has expired. Please login again.",
        ));

        self.session.clear();

        let navigator = self.navigator.clone();
        let login_path = self.session.namespace().login_path;
        let delay = self.redirect_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(login_path);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use kernel::namespace::USER;
    use platform::token::{Claims, TokenCodec};
    use serde_json::json;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct RecordingNotifier {
        notifications: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                notifications: Mutex::new(Vec::new()),
            })
        }

        fn count(&self) -> usize {
            self.notifications.lock().unwrap().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.notifications.lock().unwrap().push(notification);
        }
    }

    struct RecordingNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                visited: Mutex::new(Vec::new()),
            })
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.visited.lock().unwrap().push(path.to_string());
        }
    }

    fn status(status: u16) -> ApiFailure {
        ApiFailure::Status {
            status,
            detail: None,
            details: Vec::new(),
        }
    }

    fn authenticated_session() -> Arc<SessionManager> {
        let session = Arc::new(SessionManager::new(Arc::new(MemoryStorage::new()), &USER));
        let claims = Claims::new(
            Uuid::new_v4(),
            "81234567890",
            "user",
            std::time::Duration::from_secs(60),
        );
        session.set_session(&TokenCodec::new([1u8; 32]).issue(&claims), &json!({}));
        session
    }

    fn bridge(
        session: Arc<SessionManager>,
    ) -> (ErrorBridge, Arc<RecordingNotifier>, Arc<RecordingNavigator>) {
        let notifier = RecordingNotifier::new();
        let navigator = RecordingNavigator::new();
        let bridge = ErrorBridge::new(session, notifier.clone(), navigator.clone())
            .with_redirect_delay(Duration::from_millis(10));
        (bridge, notifier, navigator)
    }

    #[test]
    fn test_classification_is_total() {
        // Every constructible failure lands in exactly one bucket
        let cases: Vec<(ApiFailure, FailureKind)> = vec![
            (
                ApiFailure::Transport {
                    message: "timed out".into(),
                    timeout: true,
                },
                FailureKind::Network,
            ),
            (
                ApiFailure::Transport {
                    message: "connection refused".into(),
                    timeout: false,
                },
                FailureKind::Network,
            ),
            (status(400), FailureKind::Validation(vec![])),
            (status(401), FailureKind::Unauthorized),
            (status(403), FailureKind::Forbidden),
            (status(404), FailureKind::NotFound),
            (status(429), FailureKind::RateLimited),
            (status(500), FailureKind::Server),
            (status(503), FailureKind::Server),
            (status(409), FailureKind::Unknown),
            (status(418), FailureKind::Unknown),
        ];

        for (failure, expected) in cases {
            assert_eq!(classify(&failure), expected, "{:?}", failure);
        }
    }

    #[test]
    fn test_validation_details_survive_classification() {
        let failure = ApiFailure::Status {
            status: 400,
            detail: Some("Validation failed".into()),
            details: vec![FieldMessage {
                field: "phone".into(),
                message: "Phone number must be at least 10 digits".into(),
            }],
        };

        let FailureKind::Validation(fields) = classify(&failure) else {
            panic!("expected validation");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "phone");
    }

    #[tokio::test]
    async fn test_field_validation_raises_no_toast() {
        let (bridge, notifier, _) = bridge(authenticated_session());

        let failure = ApiFailure::Status {
            status: 400,
            detail: None,
            details: vec![FieldMessage {
                field: "password".into(),
                message: "Password must be at least 6 characters".into(),
            }],
        };

        bridge.handle(&failure);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_fieldless_validation_still_notifies() {
        let (bridge, notifier, _) = bridge(authenticated_session());
        bridge.handle(&status(400));
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_redirects_after_delay() {
        let session = authenticated_session();
        let (bridge, notifier, navigator) = bridge(session.clone());

        bridge.handle(&status(401));

        // Session cleared immediately, notification shown
        assert!(!session.is_authenticated());
        assert_eq!(notifier.count(), 1);

        // Redirect happens after the delay, not before
        assert!(navigator.visited.lock().unwrap().is_empty());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            navigator.visited.lock().unwrap().as_slice(),
            &[USER.login_path.to_string()]
        );
    }

    #[tokio::test]
    async fn test_forbidden_also_forces_logout() {
        let session = authenticated_session();
        let (bridge, _, navigator) = bridge(session.clone());

        bridge.handle(&status(403));

        assert!(!session.is_authenticated());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(navigator.visited.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_kinds_never_touch_the_session() {
        let session = authenticated_session();
        let (bridge, notifier, navigator) = bridge(session.clone());

        for failure in [
            status(404),
            status(429),
            status(500),
            status(418),
            ApiFailure::Transport {
                message: "timed out".into(),
                timeout: true,
            },
        ] {
            bridge.handle(&failure);
            assert!(session.is_authenticated(), "{:?}", failure);
        }

        assert_eq!(notifier.count(), 5);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(navigator.visited.lock().unwrap().is_empty());
    }
}
