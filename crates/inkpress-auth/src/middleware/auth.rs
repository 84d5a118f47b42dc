//! Session authentication extractor.
//!
//! `SessionAuth` validates the session credential on a request and hands
//! the handler an [`AuthContext`]. Verification consults the session cache
//! first; a miss (or an expired cached entry) falls back to full signature
//! verification through the codec, and a verified token repopulates the
//! cache. The cache is never trusted past the claims' own expiry.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use inkpress_auth::middleware::{AuthState, SessionAuth};
//!
//! async fn protected(SessionAuth(ctx): SessionAuth) -> String {
//!     format!("Hello, {}!", ctx.email)
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected))
//!     .with_state(auth_state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use time::OffsetDateTime;

use crate::error::AuthError;
use crate::service::AuthService;
use crate::session::{CachedSession, SessionCache};

use super::types::AuthContext;

/// State required for session authentication.
///
/// Include this in your application state and expose it to the extractor
/// via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// Token verification service.
    pub auth: Arc<AuthService>,

    /// Session cache fast path.
    pub cache: SessionCache,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(auth: Arc<AuthService>, cache: SessionCache) -> Self {
        Self { auth, cache }
    }
}

/// Axum extractor that authenticates the session credential.
///
/// # Errors
///
/// Rejects with `AuthError` (which implements `IntoResponse`) when:
/// - No credential is present (401)
/// - The token fails verification (401, uniformly for every category)
pub struct SessionAuth(pub AuthContext);

impl<S> FromRequestParts<S> for SessionAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        // 1. Locate the credential (Bearer header, then cookie).
        let token = AuthService::extract_token(&parts.headers)
            .ok_or_else(|| AuthError::unauthorized("Missing credentials"))?;

        // 2. Fast path: recently verified session.
        let now = OffsetDateTime::now_utc().unix_timestamp();
        if let Some(entry) = auth_state.cache.get_cached_session(&token).await {
            if !entry_expired(&entry, now) {
                tracing::debug!(user_id = %entry.user_id, "session cache hit");
                return Ok(SessionAuth(AuthContext::from(entry)));
            }
            // An entry that outlived its claims reads as a miss.
        }

        // 3. Full verification through the codec.
        let claims = auth_state
            .auth
            .verify_token(&token)
            .ok_or(AuthError::InvalidToken)?;

        // 4. Repopulate the fast path for subsequent requests.
        auth_state
            .cache
            .cache_session(&token, CachedSession::from(&claims))
            .await;

        tracing::debug!(user_id = %claims.user_id, "session verified");
        Ok(SessionAuth(AuthContext::from(claims)))
    }
}

fn entry_expired(entry: &CachedSession, now: i64) -> bool {
    entry.exp < now
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthResult;
    use crate::config::AuthConfig;
    use crate::permissions::Role;
    use crate::session::SessionStore;
    use async_trait::async_trait;
    use axum::http::Request;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    struct MapStore {
        entries: Mutex<HashMap<String, CachedSession>>,
    }

    impl MapStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl SessionStore for MapStore {
        async fn put(&self, key: &str, entry: CachedSession, _ttl: Duration) -> AuthResult<()> {
            self.entries.lock().unwrap().insert(key.to_string(), entry);
            Ok(())
        }

        async fn get(&self, key: &str) -> AuthResult<Option<CachedSession>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn delete(&self, key: &str) -> AuthResult<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn auth_service() -> Arc<AuthService> {
        Arc::new(AuthService::new(&AuthConfig {
            secret: "extractor-test-secret".to_string(),
            ..AuthConfig::default()
        }))
    }

    fn state_with_store(store: Arc<MapStore>) -> AuthState {
        AuthState::new(
            auth_service(),
            SessionCache::new(store, Duration::from_secs(300)),
        )
    }

    fn parts_with_bearer(token: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn test_missing_credentials_rejected() {
        let state = state_with_store(Arc::new(MapStore::new()));
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();

        let err = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let state = state_with_store(Arc::new(MapStore::new()));
        let mut parts = parts_with_bearer("not.a.token");

        let err = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_valid_token_authenticates_and_populates_cache() {
        let store = Arc::new(MapStore::new());
        let state = state_with_store(store.clone());
        let token = state
            .auth
            .generate_token("u1", "a@b.com", Role::Editor)
            .unwrap();

        let mut parts = parts_with_bearer(&token);
        let SessionAuth(ctx) = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(ctx.user_id, "u1");
        assert_eq!(ctx.role, Role::Editor);

        // Verification left the claims in the cache.
        let cached = store
            .entries
            .lock()
            .unwrap()
            .get(&format!("session:{token}"))
            .cloned();
        assert_eq!(cached.map(|e| e.user_id), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_verification() {
        let store = Arc::new(MapStore::new());
        let state = state_with_store(store.clone());

        // An entry cached under an opaque key the codec would reject.
        let now = OffsetDateTime::now_utc().unix_timestamp();
        store
            .put(
                "session:opaque-token",
                CachedSession {
                    user_id: "cached-user".to_string(),
                    email: "c@d.com".to_string(),
                    role: Role::Admin,
                    exp: now + 600,
                },
                Duration::from_secs(300),
            )
            .await
            .unwrap();

        let mut parts = parts_with_bearer("opaque-token");
        let SessionAuth(ctx) = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(ctx.user_id, "cached-user");
    }

    #[tokio::test]
    async fn test_expired_cache_entry_falls_back_to_codec() {
        let store = Arc::new(MapStore::new());
        let state = state_with_store(store.clone());

        let now = OffsetDateTime::now_utc().unix_timestamp();
        store
            .put(
                "session:stale-token",
                CachedSession {
                    user_id: "stale".to_string(),
                    email: "s@t.com".to_string(),
                    role: Role::Admin,
                    exp: now - 10,
                },
                Duration::from_secs(300),
            )
            .await
            .unwrap();

        // The stale entry must not authenticate; the token itself is
        // garbage, so the request is rejected outright.
        let mut parts = parts_with_bearer("stale-token");
        let err = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_invalidated_session_still_verifies_by_signature() {
        let store = Arc::new(MapStore::new());
        let state = state_with_store(store.clone());
        let token = state
            .auth
            .generate_token("u1", "a@b.com", Role::Viewer)
            .unwrap();

        // Authenticate once, then drop the cache entry (logout semantics).
        let mut parts = parts_with_bearer(&token);
        SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        state.cache.invalidate_session(&token).await;

        // The shortcut is gone, but the token itself remains valid.
        assert!(state.cache.get_cached_session(&token).await.is_none());
        let mut parts = parts_with_bearer(&token);
        let SessionAuth(ctx) = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(ctx.user_id, "u1");
    }

    #[tokio::test]
    async fn test_works_without_cache_store() {
        let state = AuthState::new(auth_service(), SessionCache::disabled());
        let token = state
            .auth
            .generate_token("u1", "a@b.com", Role::Viewer)
            .unwrap();

        let mut parts = parts_with_bearer(&token);
        let SessionAuth(ctx) = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(ctx.user_id, "u1");
    }

    #[tokio::test]
    async fn test_cookie_credential_accepted() {
        let state = state_with_store(Arc::new(MapStore::new()));
        let token = state
            .auth
            .generate_token("u1", "a@b.com", Role::Viewer)
            .unwrap();

        let (mut parts, ()) = Request::builder()
            .header("Cookie", format!("auth_token={token}"))
            .body(())
            .unwrap()
            .into_parts();

        let SessionAuth(ctx) = SessionAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(ctx.user_id, "u1");
    }
}
