//! Signed Bearer Token Codec
//!
//! Issues and verifies opaque bearer tokens of the form
//! `base64url(claims JSON) "." base64url(HMAC-SHA256 signature)`.
//!
//! The claim set carries the subject id, the login identifier, the
//! namespace role, and issued-at/expiry timestamps. Expiry is always
//! exactly `iat + ttl`; tokens are never renewed, a new sign-in is
//! required once a token lapses.
//!
//! Verification checks the signature and the expiry in one pass. Every
//! failure collapses to a single [`TokenError::Invalid`] so callers
//! cannot distinguish a forged token from an expired one; the specific
//! cause is only recorded in debug logs.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use uuid::Uuid;

/// Token claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id (the record's primary key)
    pub sub: Uuid,
    /// Login identifier (phone or email)
    pub identifier: String,
    /// Namespace role code ("user" / "admin")
    pub role: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds (always `iat + ttl`)
    pub exp: i64,
}

impl Claims {
    /// Create a claim set issued now
    pub fn new(sub: Uuid, identifier: impl Into<String>, role: &str, ttl: Duration) -> Self {
        Self::issued_at(sub, identifier, role, ttl, Utc::now().timestamp())
    }

    /// Create a claim set with an explicit issued-at timestamp
    pub fn issued_at(
        sub: Uuid,
        identifier: impl Into<String>,
        role: &str,
        ttl: Duration,
        iat: i64,
    ) -> Self {
        Self {
            sub,
            identifier: identifier.into(),
            role: role.to_string(),
            iat,
            exp: iat + ttl.as_secs() as i64,
        }
    }

    /// Whether the claim set has lapsed at the given instant
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    /// Whether the claim set has lapsed now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

/// Token verification failure
///
/// Deliberately a single variant: malformed, tampered, and expired
/// tokens are indistinguishable to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,
}

fn rejected(cause: &'static str) -> TokenError {
    tracing::debug!(cause, "Token rejected");
    TokenError::Invalid
}

/// HMAC-SHA256 token issuer/verifier
///
/// The signing secret is process-wide configuration; see the api
/// binary for how it is sourced and why startup fails without it.
pub struct TokenCodec {
    secret: [u8; 32],
}

impl TokenCodec {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    /// Sign a claim set into a bearer token
    pub fn issue(&self, claims: &Claims) -> String {
        let payload = serde_json::to_vec(claims).expect("claims serialize to JSON");
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!("{}.{}", payload_b64, URL_SAFE_NO_PAD.encode(signature))
    }

    /// Verify signature and expiry, returning the claims on success
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify against an explicit clock (expiry boundary is `iat + ttl`)
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or_else(|| rejected("malformed"))?;

        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload_b64.as_bytes());

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| rejected("signature encoding"))?;

        mac.verify_slice(&signature)
            .map_err(|_| rejected("signature mismatch"))?;

        let claims = decode_payload(payload_b64).ok_or_else(|| rejected("payload"))?;

        if claims.is_expired_at(now) {
            return Err(rejected("expired"));
        }

        Ok(claims)
    }

    /// Decode claims WITHOUT verifying the signature
    ///
    /// Only for local expiry pre-checks before a network round-trip.
    /// Never authoritative for access control.
    pub fn decode(token: &str) -> Option<Claims> {
        let payload_b64 = token.split('.').next()?;
        decode_payload(payload_b64)
    }
}

fn decode_payload(payload_b64: &str) -> Option<Claims> {
    let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
    serde_json::from_slice(&payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new([7u8; 32])
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let codec = codec();
        let claims = Claims::new(Uuid::new_v4(), "081234567890", "user", Duration::from_secs(60));
        let token = codec.issue(&claims);

        let verified = codec.verify(&token).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn test_expiry_is_exactly_iat_plus_ttl() {
        let claims = Claims::issued_at(
            Uuid::new_v4(),
            "a@x.com",
            "admin",
            Duration::from_secs(24 * 3600),
            1_700_000_000,
        );
        assert_eq!(claims.exp, 1_700_000_000 + 24 * 3600);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let iat = 1_700_000_000;
        let ttl = Duration::from_secs(3600);
        let claims = Claims::issued_at(Uuid::new_v4(), "081234567890", "user", ttl, iat);
        let token = codec.issue(&claims);

        // Just before expiry: valid
        assert!(codec.verify_at(&token, iat + 3600 - 1).is_ok());
        // Just after expiry: invalid
        assert_eq!(
            codec.verify_at(&token, iat + 3600 + 1),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let claims = Claims::new(Uuid::new_v4(), "081234567890", "user", Duration::from_secs(60));
        let token = codec.issue(&claims);

        let (_, signature) = token.split_once('.').unwrap();
        let forged_claims = Claims::new(claims.sub, claims.identifier.clone(), "admin", Duration::from_secs(60));
        let forged_payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}", forged_payload, signature);

        assert_eq!(codec.verify(&forged), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "081234567890", "user", Duration::from_secs(60));
        let token = codec().issue(&claims);

        let other = TokenCodec::new([8u8; 32]);
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_malformed_rejected() {
        let codec = codec();
        assert_eq!(codec.verify(""), Err(TokenError::Invalid));
        assert_eq!(codec.verify("no-dot-here"), Err(TokenError::Invalid));
        assert_eq!(codec.verify("a.b"), Err(TokenError::Invalid));
        assert_eq!(codec.verify("a.b.c"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_decode_skips_signature_check() {
        let codec = codec();
        let claims = Claims::new(Uuid::new_v4(), "081234567890", "user", Duration::from_secs(60));
        let token = codec.issue(&claims);

        // Break the signature; decode still reads the claims
        let (payload, _) = token.split_once('.').unwrap();
        let broken = format!("{}.{}", payload, "AAAA");
        assert_eq!(TokenCodec::decode(&broken), Some(claims));

        // But verification refuses it
        assert_eq!(codec.verify(&broken), Err(TokenError::Invalid));
    }

    #[test]
    fn test_decode_expired_token_still_returns_claims() {
        let codec = codec();
        let claims = Claims::issued_at(
            Uuid::new_v4(),
            "081234567890",
            "user",
            Duration::from_secs(1),
            0,
        );
        let token = codec.issue(&claims);

        // Decode is a pure read; the caller is responsible for the expiry check
        let decoded = TokenCodec::decode(&token).unwrap();
        assert!(decoded.is_expired());
    }
}
