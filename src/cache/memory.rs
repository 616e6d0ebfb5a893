//! In-memory cache backend

use super::{pattern_matches, CacheResult, QueryCache};
use dashmap::DashMap;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Process-local cache over a concurrent map
///
/// Expired entries are dropped lazily on `get`.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl QueryCache for InMemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                debug!(key, "Cache hit");
                return Ok(Some(entry.value.clone()));
            }
        }
        // Missing or expired; the read guard above is released by now
        if self.entries.remove_if(key, |_, e| e.expires_at <= now).is_some() {
            debug!(key, "Cache entry expired");
        } else {
            debug!(key, "Cache miss");
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) -> CacheResult<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
        debug!(key, ttl_secs = ttl.as_secs(), "Cache set");
        Ok(())
    }

    fn invalidate(&self, pattern: &str) -> CacheResult<usize> {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern_matches(pattern, key));
        let removed = before.saturating_sub(self.entries.len());
        debug!(pattern, removed, "Cache invalidate");
        Ok(removed)
    }
}
