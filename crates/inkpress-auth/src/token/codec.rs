//! Session token encoding and verification.
//!
//! Tokens are compact JWS-style strings: three base64url segments
//! (`header.payload.signature`) signed with HMAC-SHA256 under a server
//! secret. The header is fixed to `{"alg":"HS256","typ":"JWT"}`.
//!
//! Verification collapses every failure category (wrong segment count,
//! malformed base64 or JSON, signature mismatch, expiry) into the single
//! opaque [`InvalidToken`] result so callers cannot probe which check
//! rejected a token.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use time::OffsetDateTime;

use crate::error::AuthError;
use crate::permissions::Role;

type HmacSha256 = Hmac<Sha256>;

/// Fixed token header.
#[derive(Debug, Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: TokenHeader = TokenHeader {
    alg: "HS256",
    typ: "JWT",
};

/// Claims carried inside a session token.
///
/// A token is immutable once issued; refreshing a session means issuing a
/// new token. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Owning user id (`super-admin` for the environment admin).
    #[serde(rename = "userId")]
    pub user_id: String,

    /// User email at issuance time.
    pub email: String,

    /// Role at issuance time.
    pub role: Role,

    /// Expiration time (unix seconds).
    pub exp: i64,

    /// Issued-at time (unix seconds).
    pub iat: i64,
}

impl SessionClaims {
    /// Returns `true` if the claims are expired at `now` (unix seconds).
    ///
    /// Expiry is strict: a token is still valid during the second named by
    /// `exp`.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }
}

/// Opaque verification failure.
///
/// Carries no detail about which check rejected the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid session token")]
pub struct InvalidToken;

/// Encoder/verifier for session tokens.
///
/// Thread-safe; signing is pure computation over the owned secret, so a
/// single codec can serve all requests concurrently.
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    /// Creates a codec signing with the given secret.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Encodes and signs the given claims.
    ///
    /// Deterministic for identical claims and secret; the caller sets the
    /// timestamp fields.
    ///
    /// # Errors
    ///
    /// Returns an error only if claim serialization fails, which indicates
    /// an internal bug rather than bad input.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        let header_json = serde_json::to_string(&HEADER)
            .map_err(|e| AuthError::internal(format!("header serialization failed: {e}")))?;
        let payload_json = serde_json::to_string(claims)
            .map_err(|e| AuthError::internal(format!("claims serialization failed: {e}")))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(payload_json)
        );

        let mut mac = self.mac();
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verifies a token against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToken`] for every failure category.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, InvalidToken> {
        self.verify_at(token, OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Verifies a token against an explicit clock (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToken`] for every failure category.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<SessionClaims, InvalidToken> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(InvalidToken);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| InvalidToken)?;

        // The MAC primitive's own verify performs a constant-time compare.
        let mut mac = self.mac();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature).map_err(|_| InvalidToken)?;

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| InvalidToken)?;
        let claims: SessionClaims =
            serde_json::from_slice(&payload_json).map_err(|_| InvalidToken)?;

        if claims.is_expired_at(now) {
            return Err(InvalidToken);
        }

        Ok(claims)
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }
}
