//! Credential and token lifecycle service.
//!
//! Bridges passwords and session tokens: owns the signing secret (through
//! the codec), the digest policy, and credential extraction from requests.

use std::sync::LazyLock;
use std::time::Duration;

use axum::http::{HeaderMap, header};
use regex::Regex;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::config::AuthConfig;
use crate::permissions::Role;
use crate::token::{SessionClaims, TokenCodec};

/// Application-wide password salt.
///
/// A shared salt defends against plain rainbow tables but, unlike a
/// per-user salt, not against a dictionary precomputed for this
/// deployment. Kept for compatibility with existing digests; see
/// DESIGN.md before reusing this scheme anywhere else.
const PASSWORD_SALT: &str = "salt-change-in-production";

static COOKIE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"auth_token=([^;]+)").expect("cookie token pattern is valid"));

/// Authentication service.
///
/// Stateless apart from its configuration; safe to share behind an `Arc`
/// and call from any number of concurrent requests.
pub struct AuthService {
    codec: TokenCodec,
    token_lifetime: Duration,
}

impl AuthService {
    /// Creates a service from validated configuration.
    ///
    /// Logs a warning when the insecure development secret is in use.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        if config.uses_insecure_secret() {
            tracing::warn!(
                "signing tokens with the insecure development secret; \
                 set auth.secret before deploying"
            );
        }

        Self {
            codec: TokenCodec::new(config.effective_secret().as_bytes().to_vec()),
            token_lifetime: config.token_lifetime,
        }
    }

    /// Digests a password for storage.
    ///
    /// SHA-256 over the password concatenated with the application salt,
    /// rendered as lowercase hex.
    #[must_use]
    pub fn hash_password(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(PASSWORD_SALT.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Checks a password against a stored digest.
    #[must_use]
    pub fn verify_password(&self, password: &str, digest: &str) -> bool {
        self.hash_password(password) == digest
    }

    /// Issues a session token for the given principal.
    ///
    /// Sets `iat` to now and `exp` to now plus the configured lifetime;
    /// the lifetime is fixed per deployment, not per call.
    ///
    /// # Errors
    ///
    /// Returns an error if token encoding fails.
    pub fn generate_token(&self, user_id: &str, email: &str, role: Role) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = SessionClaims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: now + self.token_lifetime.as_secs() as i64,
            iat: now,
        };

        self.codec.issue(&claims)
    }

    /// Verifies a session token.
    ///
    /// Returns `None` uniformly for every failure category.
    #[must_use]
    pub fn verify_token(&self, token: &str) -> Option<SessionClaims> {
        match self.codec.verify(token) {
            Ok(claims) => Some(claims),
            Err(_) => {
                tracing::debug!("session token failed verification");
                None
            }
        }
    }

    /// Extracts a session token from request headers.
    ///
    /// The `Authorization: Bearer` header takes precedence; the
    /// `auth_token` cookie is the fallback. The order is part of the
    /// contract: it decides which credential wins when both are present.
    #[must_use]
    pub fn extract_token(headers: &HeaderMap) -> Option<String> {
        if let Some(auth_header) = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            && let Some(token) = auth_header.strip_prefix("Bearer ")
            && !token.is_empty()
        {
            return Some(token.to_string());
        }

        let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
        COOKIE_TOKEN_RE
            .captures(cookie_header)
            .map(|caps| caps[1].to_string())
    }
}
