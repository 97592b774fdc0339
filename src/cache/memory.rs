use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;

use super::{CachedSearch, EvictionPolicy, SearchCache};
use crate::models::SearchResponse;

/// Process-wide, size-bounded in-memory search cache.
pub struct MemorySearchCache {
    inner: Mutex<Inner>,
    capacity: usize,
    policy: EvictionPolicy,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, CachedSearch>,
    /// Front is the next key to evict.
    order: VecDeque<String>,
}

impl Inner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key)
            && let Some(k) = self.order.remove(pos)
        {
            self.order.push_back(k);
        }
    }

    fn forget(&mut self, key: &str) -> bool {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.entries.remove(key).is_some()
    }
}

impl MemorySearchCache {
    #[must_use]
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            policy,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Keys in eviction order, oldest first.
    pub async fn keys(&self) -> Vec<String> {
        self.inner.lock().await.order.iter().cloned().collect()
    }
}

#[async_trait::async_trait]
impl SearchCache for MemorySearchCache {
    async fn get(&self, key: &str) -> Option<CachedSearch> {
        let mut inner = self.inner.lock().await;
        let entry = inner.entries.get(key).cloned()?;
        if self.policy == EvictionPolicy::Lru {
            inner.touch(key);
        }
        Some(entry)
    }

    async fn set(&self, key: &str, result: SearchResponse) {
        let mut inner = self.inner.lock().await;

        let entry = CachedSearch::new(result);
        if inner.entries.insert(key.to_string(), entry).is_some() {
            // Replacing a value keeps its FIFO slot.
            if self.policy == EvictionPolicy::Lru {
                inner.touch(key);
            }
        } else {
            inner.order.push_back(key.to_string());
        }

        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(key = %oldest, "Evicted search cache entry");
        }
    }

    async fn evict(&self, key: &str) -> bool {
        self.inner.lock().await.forget(key)
    }

    async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }
}
