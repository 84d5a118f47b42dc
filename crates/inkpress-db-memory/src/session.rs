//! In-memory session cache store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use inkpress_auth::{AuthResult, CachedSession, SessionStore};

/// Default maximum entry count to bound memory growth.
const DEFAULT_MAX_SIZE: usize = 10_000;

/// Entry with its own deadline; the store enforces TTL on read.
struct StoredSession {
    entry: CachedSession,
    expires_at: Instant,
}

/// In-memory [`SessionStore`] with per-entry TTL and hit/miss telemetry.
///
/// Expired entries read as absent and are removed on access. The size cap
/// guards against unbounded growth from unique-token floods: at capacity,
/// expired entries are swept, and if the store is still full the new entry
/// is dropped rather than evicting a live one.
pub struct MemorySessionStore {
    entries: DashMap<String, StoredSession>,
    max_size: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MemorySessionStore {
    /// Creates a store with the default size cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    /// Creates a store with an explicit size cap.
    #[must_use]
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_size,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Removes expired entries, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, stored| stored.expires_at > now);
        let removed = before - self.entries.len();
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Returns store statistics.
    #[must_use]
    pub fn stats(&self) -> SessionStoreStats {
        SessionStoreStats {
            size: self.entries.len(),
            max_size: self.max_size,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, key: &str, entry: CachedSession, ttl: Duration) -> AuthResult<()> {
        if self.entries.len() >= self.max_size && !self.entries.contains_key(key) {
            self.sweep_expired();
            if self.entries.len() >= self.max_size {
                tracing::warn!(max_size = self.max_size, "session store at capacity");
                return Ok(());
            }
        }

        self.entries.insert(
            key.to_string(),
            StoredSession {
                entry,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<CachedSession>> {
        let now = Instant::now();

        if let Some(stored) = self.entries.get(key) {
            if stored.expires_at > now {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(stored.entry.clone()));
            }
            drop(stored);
            self.entries.remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    async fn delete(&self, key: &str) -> AuthResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Statistics for the in-memory session store.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SessionStoreStats {
    /// Entries currently held.
    pub size: usize,
    /// Maximum allowed entries.
    pub max_size: usize,
    /// Lookups answered from a live entry.
    pub hits: u64,
    /// Lookups that found nothing usable.
    pub misses: u64,
    /// Entries dropped by TTL expiry or capacity sweeps.
    pub evictions: u64,
}

impl SessionStoreStats {
    /// Hit rate as a percentage.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpress_auth::Role;

    fn entry(user_id: &str) -> CachedSession {
        CachedSession {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            role: Role::Viewer,
            exp: 4_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemorySessionStore::new();

        store
            .put("session:t1", entry("u1"), Duration::from_secs(300))
            .await
            .unwrap();
        let got = store.get("session:t1").await.unwrap().unwrap();
        assert_eq!(got.user_id, "u1");

        store.delete("session:t1").await.unwrap();
        assert!(store.get("session:t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let store = MemorySessionStore::new();
        store
            .put("session:t1", entry("u1"), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(store.get("session:t1").await.unwrap().is_none());
        assert_eq!(store.stats().size, 0);
        assert_eq!(store.stats().evictions, 1);
    }

    #[tokio::test]
    async fn test_put_resets_ttl() {
        let store = MemorySessionStore::new();
        store
            .put("session:t1", entry("u1"), Duration::from_millis(10))
            .await
            .unwrap();
        store
            .put("session:t1", entry("u1"), Duration::from_secs(300))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(store.get("session:t1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stats_track_hits_and_misses() {
        let store = MemorySessionStore::new();
        store
            .put("session:t1", entry("u1"), Duration::from_secs(300))
            .await
            .unwrap();

        store.get("session:t1").await.unwrap();
        store.get("session:missing").await.unwrap();
        store.get("session:missing").await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert!((stats.hit_rate() - 33.333).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_capacity_drops_new_entries_when_full_of_live_ones() {
        let store = MemorySessionStore::with_max_size(2);
        store
            .put("session:t1", entry("u1"), Duration::from_secs(300))
            .await
            .unwrap();
        store
            .put("session:t2", entry("u2"), Duration::from_secs(300))
            .await
            .unwrap();
        store
            .put("session:t3", entry("u3"), Duration::from_secs(300))
            .await
            .unwrap();

        assert_eq!(store.stats().size, 2);
        assert!(store.get("session:t3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_capacity_sweep_admits_after_expiry() {
        let store = MemorySessionStore::with_max_size(1);
        store
            .put("session:t1", entry("u1"), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        store
            .put("session:t2", entry("u2"), Duration::from_secs(300))
            .await
            .unwrap();
        assert!(store.get("session:t2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_at_capacity_keeps_existing_key() {
        let store = MemorySessionStore::with_max_size(1);
        store
            .put("session:t1", entry("u1"), Duration::from_secs(300))
            .await
            .unwrap();
        store
            .put("session:t1", entry("u1-updated"), Duration::from_secs(300))
            .await
            .unwrap();

        let got = store.get("session:t1").await.unwrap().unwrap();
        assert_eq!(got.user_id, "u1-updated");
    }
}
