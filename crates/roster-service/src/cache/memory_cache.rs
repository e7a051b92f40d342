//! In-process cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use roster_core::RosterResult;
use shaku::Component;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Default TTL for cached items (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A cached value and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache service with per-entry expiry.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct MemoryCacheService {
    entries: RwLock<HashMap<String, CacheEntry>>,
    #[shaku(default = true)]
    enabled: bool,
}

impl MemoryCacheService {
    /// Create an enabled cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            enabled: true,
        }
    }

    /// Create a no-op cache service. Every read misses.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            enabled: false,
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Returns true if no live entries remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCacheService {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_pattern(key: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[async_trait]
impl CacheInterface for MemoryCacheService {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let now = Instant::now();
        let value = {
            let entries = self.entries.read().await;
            entries
                .get(key)
                .filter(|e| !e.is_expired(now))
                .map(|e| e.value.clone())
        };

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => {
                debug!("Cache miss for key '{}'", key);
                let mut entries = self.entries.write().await;
                if entries.get(key).is_some_and(|e| e.is_expired(now)) {
                    entries.remove(key);
                }
            }
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);

        debug!("Cached key '{}' with TTL {}s", key, ttl.as_secs());
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let deleted = self.entries.write().await.remove(key).is_some();
        debug!("Deleted key '{}': {}", key, deleted);
        Ok(deleted)
    }

    async fn delete_pattern(&self, pattern: &str) -> RosterResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !matches_pattern(key, pattern));
        let deleted = (before - entries.len()) as u64;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }
}

impl std::fmt::Debug for MemoryCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheService")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
