//! API Server Entry Point
//!
//! Wires the auth stack: database pool, migrations, signing-key
//! configuration, rate limiting, the edge route guard, and the HTTP
//! server. Startup failures use `anyhow`; request-path errors use
//! `kernel::error::AppError`.

use auth::middleware::{GuardState, RateLimitState, limit_auth_requests, route_guard};
use auth::{AuthConfig, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::rate_limit::RateLimitConfig;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Signing-key policy: release builds refuse to start without
    // AUTH_TOKEN_SECRET (from_env fails closed); development runs on a
    // generated key and says so loudly.
    let auth_config = if cfg!(debug_assertions) {
        tracing::warn!(
            "Using a generated development signing key; every restart invalidates all tokens"
        );
        AuthConfig::development()
    } else {
        AuthConfig::from_env()?
    };

    let repo = PgAuthRepository::new(pool.clone());

    // Per-IP throttle on the credential endpoints
    let rate_limit = RateLimitState::new(RateLimitConfig::new(10, 60));

    // Edge page guard: anonymous visitors bounce off protected paths,
    // active sessions bounce off the auth forms
    let guard = GuardState::new(Arc::new(auth_config.clone()));

    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(repo, auth_config).layer(axum::middleware::from_fn_with_state(
                rate_limit,
                limit_auth_requests,
            )),
        )
        .layer(axum::middleware::from_fn_with_state(guard, route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// CORS for the browser frontend; origins come from FRONTEND_ORIGINS
/// (comma-separated), credentials allowed for the admin cookie.
fn cors_layer() -> CorsLayer {
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
