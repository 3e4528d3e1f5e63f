//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::env;
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use platform::token::TokenCodec;

use crate::domain::value_object::role::Role;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Environment variable carrying the base64-encoded 32-byte signing key
pub const TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

/// Environment variable carrying the admin registration invite code
pub const ADMIN_INVITE_ENV: &str = "ADMIN_INVITE_CODE";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing key (32 bytes, HMAC-SHA256)
    pub token_secret: [u8; 32],
    /// Token TTL for regular users (7 days)
    pub user_token_ttl: Duration,
    /// Token TTL for admins (24 hours)
    pub admin_token_ttl: Duration,
    /// Whether to require Secure on the admin session cookie
    pub cookie_secure: bool,
    /// SameSite policy for the admin session cookie
    pub cookie_same_site: SameSite,
    /// Invite code gating admin registration; unset disables it entirely
    pub admin_invite_code: Option<String>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            user_token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            admin_token_ttl: Duration::from_secs(24 * 3600),    // 24 hours
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            admin_invite_code: None,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing key (for development)
    pub fn with_random_secret() -> Self {
        let bytes = platform::crypto::random_bytes(32);
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, random key)
    ///
    /// The key changes on every start, so every restart invalidates all
    /// outstanding tokens. Fine for development, useless for anything else.
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Load configuration from the environment, failing closed
    ///
    /// `AUTH_TOKEN_SECRET` must be present and decode to 32 non-zero
    /// bytes; a deployment without it refuses to start rather than
    /// silently signing tokens with a guessable key.
    pub fn from_env() -> AppResult<Self> {
        let secret_b64 = env::var(TOKEN_SECRET_ENV).map_err(|_| {
            AppError::internal(format!(
                "{} must be set (base64, 32 bytes) outside development",
                TOKEN_SECRET_ENV
            ))
        })?;

        let secret_bytes = platform::crypto::from_base64(secret_b64.trim())
            .map_err(|_| AppError::internal(format!("{} is not valid base64", TOKEN_SECRET_ENV)))?;

        if secret_bytes.len() != 32 {
            return Err(AppError::internal(format!(
                "{} must decode to exactly 32 bytes (got {})",
                TOKEN_SECRET_ENV,
                secret_bytes.len()
            )));
        }

        let mut token_secret = [0u8; 32];
        token_secret.copy_from_slice(&secret_bytes);

        if token_secret == [0u8; 32] {
            return Err(AppError::internal(format!(
                "{} is a placeholder (all zeroes); generate a real key",
                TOKEN_SECRET_ENV
            )));
        }

        let admin_invite_code = env::var(ADMIN_INVITE_ENV).ok().filter(|c| !c.is_empty());
        if admin_invite_code.is_none() {
            tracing::warn!(
                "{} not set; admin registration is disabled",
                ADMIN_INVITE_ENV
            );
        }

        let password_pepper = env::var("AUTH_PASSWORD_PEPPER")
            .ok()
            .filter(|p| !p.is_empty())
            .map(|p| p.into_bytes());

        Ok(Self {
            token_secret,
            admin_invite_code,
            password_pepper,
            ..Default::default()
        })
    }

    /// TTL for tokens issued to the given role
    pub fn token_ttl(&self, role: Role) -> Duration {
        match role {
            Role::User => self.user_token_ttl,
            Role::Admin => self.admin_token_ttl,
        }
    }

    /// Codec bound to this configuration's signing key
    pub fn codec(&self) -> TokenCodec {
        TokenCodec::new(self.token_secret)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
