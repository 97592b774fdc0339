//! Search result cache.
//!
//! The proxy talks to the cache only through [`SearchCache`], so the
//! in-memory store can be swapped for another backend without touching the
//! search service.

pub mod memory;

pub use memory::MemorySearchCache;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::models::SearchResponse;

/// Which key goes when the cache grows past its capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Oldest-inserted key first. Reads do not affect order.
    #[default]
    Fifo,
    /// Least recently read or written key first.
    Lru,
}

/// A normalized search result together with the moment it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSearch {
    pub result: SearchResponse,
    pub stored_at: Instant,
}

impl CachedSearch {
    #[must_use]
    pub fn new(result: SearchResponse) -> Self {
        Self {
            result,
            stored_at: Instant::now(),
        }
    }

    /// An entry is fresh while `now - stored_at < ttl`.
    #[must_use]
    pub fn is_fresh_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }

    #[must_use]
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(Instant::now(), ttl)
    }
}

#[async_trait::async_trait]
pub trait SearchCache: Send + Sync {
    /// Returns the entry for `key` whether or not it is still fresh.
    /// Freshness is the caller's decision.
    async fn get(&self, key: &str) -> Option<CachedSearch>;

    /// Stores `result` stamped with the current time, evicting per policy
    /// when the capacity is exceeded.
    async fn set(&self, key: &str, result: SearchResponse);

    /// Removes `key`. Returns whether it was present.
    async fn evict(&self, key: &str) -> bool;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
