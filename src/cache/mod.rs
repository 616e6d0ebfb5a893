//! Query result caching
//!
//! Provides:
//! - The `QueryCache` trait (get/set with TTL/invalidate)
//! - An in-memory backend with per-entry expiry
//! - Key builders for every cached query
//!
//! A cache is never authoritative. Callers treat a miss, an expired entry
//! or a backend error the same way: recompute from the live graph.

mod memory;

pub use memory::InMemoryCache;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors from cache backends
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache for query results
pub trait QueryCache: Send + Sync {
    /// Get a live (unexpired) value
    fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Store a value for `ttl`
    fn set(&self, key: &str, value: Value, ttl: Duration) -> CacheResult<()>;

    /// Remove matching keys; returns how many were removed.
    ///
    /// A pattern ending in `*` matches keys by prefix; any other pattern
    /// matches keys containing it.
    fn invalidate(&self, pattern: &str) -> CacheResult<usize>;
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Default TTL in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Cache keys, one builder per cached query
pub mod keys {
    pub const PAPERS: &str = "papers";
    pub const GRAPH: &str = "graph";

    /// Patterns that together cover every query key
    pub const ALL_PATTERNS: [&str; 5] = [PAPERS, GRAPH, "author:*", "citations:*", "influential:*"];

    pub fn author(name: &str) -> String {
        format!("author:{}", name)
    }

    pub fn citations(title: &str) -> String {
        format!("citations:{}", title)
    }

    pub fn influential(limit: usize) -> String {
        format!("influential:{}", limit)
    }
}

/// Whether `key` matches an invalidation pattern
pub(crate) fn pattern_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key.contains(pattern),
    }
}
