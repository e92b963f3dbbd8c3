//! In-memory time-to-live cache for provider results.
//!
//! Keys are BLAKE3 digests over a function identity plus its arguments, so
//! one cache type serves both price batches and membership lists. A cache is
//! owned by the scanner instance that uses it; there is no process-wide
//! store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Digest of `(function identity, arguments)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Build a key from a function identity and its length-delimited arguments.
    pub fn new(function: &str, args: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(function.as_bytes());
        for arg in args {
            hasher.update(&(arg.len() as u64).to_le_bytes());
            hasher.update(arg);
        }
        Self(*hasher.finalize().as_bytes())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe TTL cache. A zero TTL disables caching.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<CacheKey, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached value for `key`, if present and not older than the TTL.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let entries = self.lock();
        entries.get(key).and_then(|entry| {
            if Instant::now() < entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Store `value` under `key`, evicting expired entries. No-op when the
    /// cache is disabled.
    pub fn put(&self, key: CacheKey, value: V) {
        if self.is_disabled() {
            return;
        }
        let now = Instant::now();
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
