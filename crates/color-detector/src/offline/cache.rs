//! Named response caches.
//!
//! [`CacheStorage`] is a cloneable handle to the origin's caches, shared by
//! every worker generation so a new version can sweep out the old ones.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::http::{FetchRequest, FetchResponse};

/// A stored response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// The response as stored.
    pub response: FetchResponse,
    /// When it was stored.
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct NamedCache {
    name: String,
    entries: BTreeMap<String, CachedResponse>,
}

/// Handle to all caches of one origin.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    // Creation order matters for cross-cache lookups.
    caches: Arc<Mutex<Vec<NamedCache>>>,
}

impl CacheStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NamedCache>> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create the named cache if it doesn't exist.
    pub fn open(&self, name: &str) {
        let mut caches = self.lock();
        if !caches.iter().any(|c| c.name == name) {
            debug!(cache = name, "Creating cache");
            caches.push(NamedCache {
                name: name.to_string(),
                entries: BTreeMap::new(),
            });
        }
    }

    /// Names of all caches, in creation order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().iter().map(|c| c.name.clone()).collect()
    }

    /// Check whether a cache exists.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.lock().iter().any(|c| c.name == name)
    }

    /// Delete a cache, returning whether it existed.
    pub fn delete(&self, name: &str) -> bool {
        let mut caches = self.lock();
        let before = caches.len();
        caches.retain(|c| c.name != name);
        caches.len() != before
    }

    /// Store a response in the named cache, creating the cache if needed.
    pub fn put(&self, name: &str, request: &FetchRequest, response: FetchResponse) {
        self.open(name);
        let key = request.cache_key();
        let mut caches = self.lock();
        if let Some(cache) = caches.iter_mut().find(|c| c.name == name) {
            debug!(cache = name, url = %key, "Caching response");
            cache.entries.insert(
                key,
                CachedResponse {
                    response,
                    stored_at: Utc::now(),
                },
            );
        }
    }

    /// Look up a request in one cache.
    #[must_use]
    pub fn get(&self, name: &str, request: &FetchRequest) -> Option<CachedResponse> {
        let key = request.cache_key();
        self.lock()
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.entries.get(&key).cloned())
    }

    /// Look up a request across all caches, oldest cache first.
    #[must_use]
    pub fn match_any(&self, request: &FetchRequest) -> Option<CachedResponse> {
        let key = request.cache_key();
        self.lock()
            .iter()
            .find_map(|c| c.entries.get(&key).cloned())
    }

    /// Number of entries in the named cache.
    #[must_use]
    pub fn entry_count(&self, name: &str) -> usize {
        self.lock()
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.entries.len())
    }
}
