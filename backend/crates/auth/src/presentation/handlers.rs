//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::CookieConfig;
use platform::token::Claims;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentUserUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::entity::{admin::Admin, user::User};
use crate::domain::repository::CredentialRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AdminLoginRequest, AdminRegisterRequest, AdminView, AuthResponse, LoginRequest,
    RegisterRequest, UserView,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: CredentialRepository<User> + CredentialRepository<Admin> + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// User namespace
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository<User> + CredentialRepository<Admin> + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::<User, R>::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            identifier: req.phone,
            password: req.password,
            name: req.name,
            invite_code: None,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&output.record),
            token: output.token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository<User> + CredentialRepository<Admin> + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::<User, R>::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            identifier: req.phone,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            user: UserView::from(&output.record),
            token: output.token,
        }),
    ))
}

/// GET /api/auth/me
///
/// Claims are inserted by the bearer-auth middleware; this never sees
/// an unverified token.
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    axum::Extension(claims): axum::Extension<Claims>,
) -> AuthResult<Json<UserView>>
where
    R: CredentialRepository<User> + CredentialRepository<Admin> + Clone + Send + Sync + 'static,
{
    let use_case = CurrentUserUseCase::<User, R>::new(state.repo.clone());
    let user = use_case.execute(&claims).await?;

    Ok(Json(UserView::from(&user)))
}

// ============================================================================
// Admin namespace
// ============================================================================

/// POST /api/auth/admin/register
///
/// Success also sets the http-only admin session cookie so the edge
/// guard can see the session on page navigations.
pub async fn admin_register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<AdminRegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository<User> + CredentialRepository<Admin> + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::<Admin, R>::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            identifier: req.email,
            password: req.password,
            name: req.name,
            invite_code: req.invite_code,
        })
        .await?;

    let cookie = admin_cookie(&state.config).build_set_cookie(&output.token);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: AdminView::from(&output.record),
            token: output.token,
        }),
    ))
}

/// POST /api/auth/admin/login
pub async fn admin_login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<AdminLoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository<User> + CredentialRepository<Admin> + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::<Admin, R>::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            identifier: req.email,
            password: req.password,
        })
        .await?;

    let cookie = admin_cookie(&state.config).build_set_cookie(&output.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: AdminView::from(&output.record),
            token: output.token,
        }),
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn admin_cookie(config: &AuthConfig) -> CookieConfig {
    let mut cookie = CookieConfig::session(
        kernel::namespace::ADMIN.cookie_name,
        config.cookie_same_site,
        config.admin_token_ttl.as_secs(),
    );
    cookie.secure = config.cookie_secure;
    cookie
}
