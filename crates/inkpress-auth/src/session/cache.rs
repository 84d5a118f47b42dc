//! Cache-backed session fast path.
//!
//! The cache mirrors verified token claims keyed by the raw token string so
//! hot paths can skip signature verification. It is a disposable
//! accelerator with its own short TTL, never a source of truth: a miss (or
//! an unavailable store) always falls back to full verification, and
//! deleting an entry on logout only removes the shortcut, not the token's
//! validity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::permissions::Role;
use crate::token::SessionClaims;

/// Key prefix separating session entries from other tenants of the store.
const KEY_PREFIX: &str = "session:";

/// Claims mirrored into the cache.
///
/// A subset of [`SessionClaims`]: the issued-at timestamp is not needed to
/// answer "is this session still good".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    /// Owning user id.
    #[serde(rename = "userId")]
    pub user_id: String,

    /// User email.
    pub email: String,

    /// Role at issuance time.
    pub role: Role,

    /// Token expiration time (unix seconds).
    ///
    /// Carried so a cache hit can never outlive the token itself.
    pub exp: i64,
}

impl From<&SessionClaims> for CachedSession {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            user_id: claims.user_id.clone(),
            email: claims.email.clone(),
            role: claims.role,
            exp: claims.exp,
        }
    }
}

/// A key-value store holding cached sessions.
///
/// Each operation is a single-key atomic put/get/delete; implementations
/// need no coordination beyond per-key atomicity, and last-write-wins
/// between a concurrent `put` and `delete` of the same key is acceptable.
/// TTL expiry is the store's responsibility: `get` must treat an expired
/// entry as absent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Upserts an entry with a fresh TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    async fn put(&self, key: &str, entry: CachedSession, ttl: Duration) -> AuthResult<()>;

    /// Fetches an entry; expired entries read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    async fn get(&self, key: &str) -> AuthResult<Option<CachedSession>>;

    /// Deletes an entry. Deleting a missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    async fn delete(&self, key: &str) -> AuthResult<()>;
}

/// Fail-open wrapper around an optional [`SessionStore`].
///
/// All store failures degrade to a cache miss: authentication must keep
/// working when the cache backend is unprovisioned or down.
#[derive(Clone)]
pub struct SessionCache {
    store: Option<Arc<dyn SessionStore>>,
    ttl: Duration,
}

impl SessionCache {
    /// Creates a cache backed by the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self {
            store: Some(store),
            ttl,
        }
    }

    /// Creates a cache with no backing store; every lookup misses.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttl: Duration::ZERO,
        }
    }

    /// Returns `true` if a backing store is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }

    /// Caches verified claims under the raw token string, resetting the TTL.
    pub async fn cache_session(&self, token: &str, entry: CachedSession) {
        let Some(store) = &self.store else {
            return;
        };

        if let Err(e) = store.put(&Self::key(token), entry, self.ttl).await {
            tracing::debug!(error = %e, "session cache put failed");
        }
    }

    /// Looks up the cached session for a token.
    ///
    /// Returns `None` on a miss, an expired entry, a store failure, or when
    /// no store is configured.
    pub async fn get_cached_session(&self, token: &str) -> Option<CachedSession> {
        let store = self.store.as_ref()?;

        match store.get(&Self::key(token)).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "session cache get failed, treating as miss");
                None
            }
        }
    }

    /// Removes the cached session for a token (logout).
    ///
    /// Only the cache shortcut is removed; the token itself stays valid
    /// until its own expiry.
    pub async fn invalidate_session(&self, token: &str) {
        let Some(store) = &self.store else {
            return;
        };

        if let Err(e) = store.delete(&Self::key(token)).await {
            tracing::debug!(error = %e, "session cache delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapStore {
        entries: Mutex<HashMap<String, CachedSession>>,
    }

    impl MapStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }

        fn contains(&self, key: &str) -> bool {
            self.entries.lock().unwrap().contains_key(key)
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

    struct FailingStore;

    #[async_trait]
    impl SessionStore for FailingStore {
        async fn put(&self, _key: &str, _entry: CachedSession, _ttl: Duration) -> AuthResult<()> {
            Err(AuthError::storage("store offline"))
        }

        async fn get(&self, _key: &str) -> AuthResult<Option<CachedSession>> {
            Err(AuthError::storage("store offline"))
        }

        async fn delete(&self, _key: &str) -> AuthResult<()> {
            Err(AuthError::storage("store offline"))
        }
    }

    fn entry() -> CachedSession {
        CachedSession {
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            role: Role::Viewer,
            exp: 4_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_cache_roundtrip() {
        let store = Arc::new(MapStore::new());
        let cache = SessionCache::new(store.clone(), Duration::from_secs(300));

        cache.cache_session("tok", entry()).await;
        assert_eq!(cache.get_cached_session("tok").await, Some(entry()));

        // Entries are namespaced under the raw token string.
        assert!(store.contains("session:tok"));
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = SessionCache::new(Arc::new(MapStore::new()), Duration::from_secs(300));

        cache.cache_session("tok", entry()).await;
        cache.invalidate_session("tok").await;
        assert_eq!(cache.get_cached_session("tok").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_missing_token_is_noop() {
        let cache = SessionCache::new(Arc::new(MapStore::new()), Duration::from_secs(300));
        cache.invalidate_session("never-cached").await;
        assert_eq!(cache.get_cached_session("never-cached").await, None);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = SessionCache::disabled();
        assert!(!cache.is_enabled());

        cache.cache_session("tok", entry()).await;
        assert_eq!(cache.get_cached_session("tok").await, None);
        cache.invalidate_session("tok").await;
    }

    #[tokio::test]
    async fn test_failing_store_degrades_to_miss() {
        let cache = SessionCache::new(Arc::new(FailingStore), Duration::from_secs(300));

        cache.cache_session("tok", entry()).await;
        assert_eq!(cache.get_cached_session("tok").await, None);
        cache.invalidate_session("tok").await;
    }

    #[test]
    fn test_cached_session_from_claims() {
        let claims = SessionClaims {
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            role: Role::Editor,
            exp: 123,
            iat: 100,
        };

        let cached = CachedSession::from(&claims);
        assert_eq!(cached.user_id, "u1");
        assert_eq!(cached.role, Role::Editor);
        assert_eq!(cached.exp, 123);
    }

    #[test]
    fn test_cached_session_json_field_names() {
        let json = serde_json::to_string(&entry()).unwrap();
        assert!(json.contains("\"userId\":\"u1\""));
        assert!(json.contains("\"exp\":"));
    }
}
