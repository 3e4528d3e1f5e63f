//! Auth Middleware
//!
//! Three request-edge layers:
//! - `route_guard`: page-level gate. Redirects anonymous visitors away
//!   from protected paths (carrying a `redirect` parameter back to the
//!   original destination) and authenticated ones away from the auth
//!   forms.
//! - `require_user_auth` / `require_admin_auth`: API-level gates that
//!   verify the token and stash the claims in request extensions.
//! - `limit_auth_requests`: per-IP fixed-window throttle for the
//!   credential endpoints.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;

use kernel::namespace::{ADMIN, NamespaceSpec, USER};
use platform::cookie::extract_cookie;
use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig, RateLimitStore};
use platform::token::Claims;

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Route table (edge page guard)
// ============================================================================

/// Path prefixes gated by the edge guard
///
/// Unmatched paths pass through unchecked.
#[derive(Debug, Clone)]
pub struct RouteTable {
    /// Require a valid session
    pub protected: Vec<&'static str>,
    /// Auth forms; bounce visitors who already have a session
    pub auth_only: Vec<&'static str>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            protected: vec!["/user-profile", "/admin"],
            auth_only: vec!["/auth/login", "/auth/register", "/a/login"],
        }
    }
}

impl RouteTable {
    fn is_protected(&self, path: &str) -> bool {
        self.protected.iter().any(|route| path.starts_with(route))
    }

    fn is_auth_only(&self, path: &str) -> bool {
        self.auth_only.iter().any(|route| path.starts_with(route))
    }
}

/// State for the edge page guard
#[derive(Clone)]
pub struct GuardState {
    pub config: Arc<AuthConfig>,
    pub routes: Arc<RouteTable>,
}

impl GuardState {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            config,
            routes: Arc::new(RouteTable::default()),
        }
    }
}

/// Which namespace a path belongs to
fn namespace_for(path: &str) -> &'static NamespaceSpec {
    if path.starts_with("/admin") || path.starts_with("/a/") {
        &ADMIN
    } else {
        &USER
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Read and verify the namespace's token from the request
///
/// Admin sessions travel only in the http-only cookie; user sessions
/// may use the cookie or an Authorization header. A token of the wrong
/// namespace never authenticates.
fn verified_claims(
    config: &AuthConfig,
    headers: &HeaderMap,
    namespace: &NamespaceSpec,
) -> AuthResult<Claims> {
    let token = extract_cookie(headers, namespace.cookie_name)
        .or_else(|| {
            if namespace.role_code == USER.role_code {
                bearer_token(headers)
            } else {
                None
            }
        })
        .ok_or(AuthError::TokenInvalid)?;

    let claims = config.codec().verify(&token)?;

    if claims.role != namespace.role_code {
        return Err(AuthError::Forbidden);
    }

    Ok(claims)
}

/// Edge page guard
pub async fn route_guard(
    State(state): State<GuardState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let namespace = namespace_for(&path);

    let authenticated = verified_claims(&state.config, req.headers(), namespace).is_ok();

    if state.routes.is_protected(&path) && !authenticated {
        let login_url = format!(
            "{}?redirect={}",
            namespace.login_path,
            utf8_percent_encode(&path, NON_ALPHANUMERIC)
        );
        tracing::debug!(%path, to = %namespace.login_path, "Redirecting unauthenticated request");
        return Redirect::temporary(&login_url).into_response();
    }

    if state.routes.is_auth_only(&path) && authenticated {
        tracing::debug!(%path, to = %namespace.landing_path, "Skipping auth form for active session");
        return Redirect::temporary(namespace.landing_path).into_response();
    }

    next.run(req).await
}

// ============================================================================
// API-level auth
// ============================================================================

/// State for the API auth layers
#[derive(Clone)]
pub struct AuthLayerState {
    pub config: Arc<AuthConfig>,
}

/// Require a valid user token; stores [`Claims`] in request extensions
pub async fn require_user_auth(
    State(state): State<AuthLayerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = verified_claims(&state.config, req.headers(), &USER)
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Require a valid admin token; stores [`Claims`] in request extensions
pub async fn require_admin_auth(
    State(state): State<AuthLayerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = verified_claims(&state.config, req.headers(), &ADMIN)
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// ============================================================================
// Rate limiting
// ============================================================================

/// State for the credential-endpoint throttle
#[derive(Clone)]
pub struct RateLimitState {
    pub store: Arc<MemoryRateLimitStore>,
    pub config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            store: Arc::new(MemoryRateLimitStore::new()),
            config,
        }
    }
}

/// Per-IP throttle for login/register
pub async fn limit_auth_requests(
    State(state): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let key = platform::net::client_ip(req.headers(), direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let result = state
        .store
        .check_and_increment(&key, &state.config)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()).into_response())?;

    if !result.allowed {
        tracing::warn!(client = %key, "Rate limit exceeded on auth endpoints");
        return Err(AuthError::RateLimited.into_response());
    }

    Ok(next.run(req).await)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::time::Duration;
    use tower::util::ServiceExt;
    use uuid::Uuid;

    fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::development())
    }

    fn token_for(config: &AuthConfig, role: &str) -> String {
        let claims = Claims::new(
            Uuid::new_v4(),
            "81234567890",
            role,
            Duration::from_secs(60),
        );
        config.codec().issue(&claims)
    }

    fn guarded_app(config: Arc<AuthConfig>) -> Router {
        let state = GuardState::new(config);
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/user-profile", get(|| async { "profile" }))
            .route("/admin", get(|| async { "dashboard" }))
            .route("/auth/login", get(|| async { "login form" }))
            .route("/a/login", get(|| async { "admin login form" }))
            .layer(axum::middleware::from_fn_with_state(state, route_guard))
    }

    fn get_request(uri: &str) -> http::Request<Body> {
        http::Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: &str) -> http::Request<Body> {
        http::Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn location(res: &http::Response<axum::body::Body>) -> String {
        res.headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_protected_path_redirects_to_login_with_redirect_param() {
        let app = guarded_app(config());
        let res = app.oneshot(get_request("/user-profile")).await.unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        let loc = location(&res);
        assert!(loc.starts_with("/auth/login?redirect="));
        assert!(loc.contains("user"));
    }

    #[tokio::test]
    async fn test_admin_path_redirects_to_admin_login() {
        let app = guarded_app(config());
        let res = app.oneshot(get_request("/admin")).await.unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(location(&res).starts_with("/a/login?redirect="));
    }

    #[tokio::test]
    async fn test_unmatched_path_passes_through() {
        let app = guarded_app(config());
        let res = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authenticated_user_passes_protected_path() {
        let config = config();
        let token = token_for(&config, "user");
        let app = guarded_app(config);

        let res = app
            .oneshot(get_with_cookie(
                "/user-profile",
                &format!("auth_token={}", token),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authenticated_user_bounced_from_auth_form() {
        let config = config();
        let token = token_for(&config, "user");
        let app = guarded_app(config);

        let res = app
            .oneshot(get_with_cookie(
                "/auth/login",
                &format!("auth_token={}", token),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/");
    }

    #[tokio::test]
    async fn test_authenticated_admin_bounced_to_dashboard() {
        let config = config();
        let token = token_for(&config, "admin");
        let app = guarded_app(config);

        let res = app
            .oneshot(get_with_cookie(
                "/a/login",
                &format!("admin_token={}", token),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/admin");
    }

    #[tokio::test]
    async fn test_user_token_never_satisfies_admin_guard() {
        let config = config();
        let user_token = token_for(&config, "user");
        let app = guarded_app(config);

        // A user token presented in the admin cookie slot still redirects
        let res = app
            .oneshot(get_with_cookie(
                "/admin",
                &format!("admin_token={}", user_token),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(location(&res).starts_with("/a/login"));
    }

    #[tokio::test]
    async fn test_admin_token_never_satisfies_user_guard() {
        let config = config();
        let admin_token = token_for(&config, "admin");
        let app = guarded_app(config);

        let res = app
            .oneshot(get_with_cookie(
                "/user-profile",
                &format!("auth_token={}", admin_token),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(location(&res).starts_with("/auth/login"));
    }

    fn api_app(config: Arc<AuthConfig>) -> Router {
        let state = AuthLayerState { config };
        Router::new()
            .route("/me", get(|| async { "me" }))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                require_user_auth,
            ))
    }

    #[tokio::test]
    async fn test_api_auth_requires_bearer() {
        let app = api_app(config());
        let res = app.oneshot(get_request("/me")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_api_auth_accepts_valid_bearer() {
        let config = config();
        let token = token_for(&config, "user");
        let app = api_app(config);

        let res = app
            .oneshot(
                http::Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_auth_rejects_admin_token_with_forbidden() {
        let config = config();
        let token = token_for(&config, "admin");
        let app = api_app(config);

        let res = app
            .oneshot(
                http::Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rate_limit_returns_429() {
        let state = RateLimitState::new(RateLimitConfig::new(2, 60));
        let app = Router::new()
            .route("/login", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                state,
                limit_auth_requests,
            ));

        for _ in 0..2 {
            let res = app.clone().oneshot(get_request("/login")).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }

        let res = app.oneshot(get_request("/login")).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
