//! Auth API Transport
//!
//! Thin HTTP client for the auth endpoints plus the request-scope
//! cancellation that keeps a late-arriving response from mutating the
//! session after the user has navigated away. No retries anywhere: a
//! failed attempt is terminal and reported; the user may resubmit.

use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use kernel::namespace::{NamespaceSpec, USER};

use crate::session::SessionManager;

/// Request timeout; expiry surfaces as a transport failure, never a hang
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One field-level message from a 400 response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// A failed auth API call
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiFailure {
    /// The request never produced an HTTP response
    #[error("Network error: {message}")]
    Transport { message: String, timeout: bool },

    /// The server answered with an error status
    #[error("Request failed with status {status}")]
    Status {
        status: u16,
        detail: Option<String>,
        details: Vec<FieldMessage>,
    },
}

impl From<reqwest::Error> for ApiFailure {
    fn from(err: reqwest::Error) -> Self {
        ApiFailure::Transport {
            message: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}

/// RFC 7807 body shape produced by the server
#[derive(Debug, Default, Deserialize)]
struct ProblemBody {
    detail: Option<String>,
    #[serde(default)]
    details: Vec<FieldMessage>,
}

/// Successful register/login payload
#[derive(Debug, Clone, Deserialize)]
pub struct SessionPayload {
    pub token: String,
    pub user: serde_json::Value,
}

/// Registration form data
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub identifier: String,
    pub password: String,
    pub name: Option<String>,
    pub invite_code: Option<String>,
}

/// Transport seam for the auth endpoints
///
/// The HTTP implementation is [`HttpAuthApi`]; tests substitute fakes.
#[trait_variant::make(AuthTransport: Send)]
pub trait LocalAuthTransport {
    async fn sign_in(&self, identifier: &str, password: &str)
    -> Result<SessionPayload, ApiFailure>;

    async fn sign_up(&self, form: &SignUpForm) -> Result<SessionPayload, ApiFailure>;
}

/// reqwest-backed transport for one namespace
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
    spec: &'static NamespaceSpec,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>, spec: &'static NamespaceSpec) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("HTTP client construction");

        Self {
            http,
            base_url: base_url.into(),
            spec,
        }
    }

    fn endpoint(&self, operation: &str) -> String {
        if self.spec.role_code == USER.role_code {
            format!("{}/api/auth/{}", self.base_url, operation)
        } else {
            format!("{}/api/auth/admin/{}", self.base_url, operation)
        }
    }

    /// Request DTO field carrying the identifier for this namespace
    fn identifier_field(&self) -> &'static str {
        if self.spec.role_code == USER.role_code {
            "phone"
        } else {
            "email"
        }
    }

    async fn post(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<SessionPayload, ApiFailure> {
        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<SessionPayload>().await?);
        }

        let problem = response.json::<ProblemBody>().await.unwrap_or_default();
        Err(ApiFailure::Status {
            status: status.as_u16(),
            detail: problem.detail,
            details: problem.details,
        })
    }
}

impl AuthTransport for HttpAuthApi {
    async fn sign_in(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<SessionPayload, ApiFailure> {
        let mut body = serde_json::Map::new();
        body.insert(self.identifier_field().to_string(), identifier.into());
        body.insert("password".to_string(), password.into());

        self.post(&self.endpoint("login"), serde_json::Value::Object(body))
            .await
    }

    async fn sign_up(&self, form: &SignUpForm) -> Result<SessionPayload, ApiFailure> {
        let mut body = serde_json::Map::new();
        body.insert(
            self.identifier_field().to_string(),
            form.identifier.as_str().into(),
        );
        body.insert("password".to_string(), form.password.as_str().into());
        if let Some(name) = &form.name {
            body.insert("name".to_string(), name.as_str().into());
        }
        if let Some(code) = &form.invite_code {
            body.insert("inviteCode".to_string(), code.as_str().into());
        }

        self.post(&self.endpoint("register"), serde_json::Value::Object(body))
            .await
    }
}

/// Cancellation flag for one in-flight auth attempt
///
/// Navigation away cancels the scope; a response that arrives
/// afterwards is dropped instead of writing a session nobody asked
/// for.
#[derive(Debug, Clone, Default)]
pub struct RequestScope(Arc<AtomicBool>);

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sign in and persist the session, unless the scope was cancelled
pub async fn sign_in<T>(
    transport: &T,
    session: &SessionManager,
    scope: &RequestScope,
    identifier: &str,
    password: &str,
) -> Result<SessionPayload, ApiFailure>
where
    T: AuthTransport + Sync,
{
    let payload = transport.sign_in(identifier, password).await?;

    if scope.is_cancelled() {
        tracing::debug!("Discarding sign-in response that arrived after navigation");
        return Ok(payload);
    }

    session.set_session(&payload.token, &payload.user);
    Ok(payload)
}

/// Register and persist the session, unless the scope was cancelled
pub async fn sign_up<T>(
    transport: &T,
    session: &SessionManager,
    scope: &RequestScope,
    form: &SignUpForm,
) -> Result<SessionPayload, ApiFailure>
where
    T: AuthTransport + Sync,
{
    let payload = transport.sign_up(form).await?;

    if scope.is_cancelled() {
        tracing::debug!("Discarding sign-up response that arrived after navigation");
        return Ok(payload);
    }

    session.set_session(&payload.token, &payload.user);
    Ok(payload)
}
