//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{admin::Admin, user::User};
use crate::domain::repository::CredentialRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{self, AuthLayerState};

/// Create the Auth router with the PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: CredentialRepository<User> + CredentialRepository<Admin> + Clone + Send + Sync + 'static,
{
    let config = Arc::new(config);
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: config.clone(),
    };

    let public = Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/admin/register", post(handlers::admin_register::<R>))
        .route("/admin/login", post(handlers::admin_login::<R>));

    let protected = Router::new()
        .route("/me", get(handlers::me::<R>))
        .route_layer(axum::middleware::from_fn_with_state(
            AuthLayerState { config },
            middleware::require_user_auth,
        ));

    public.merge(protected).with_state(state)
}
