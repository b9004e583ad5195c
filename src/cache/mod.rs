/*!
 * Lookup caching.
 *
 * `LookupCache` memoizes remote lookups under string keys built by the pure
 * functions in [`keys`]. One cache instance is owned by each service, so
 * tests get isolated caches and a session can reset them explicitly.
 */

use log::debug;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

pub mod keys;

pub use keys::{dictionary_key, subtitle_key, translation_key};

/// Hit/miss counters of a cache
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

type InFlight = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Held while one key is being fetched.
///
/// Dropping the last holder of a key removes its lock from the in-flight map.
pub struct KeyLock {
    key: String,
    lock: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
    in_flight: InFlight,
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut in_flight = self.in_flight.lock();
        // Only the map and this guard still point at the lock: nobody is waiting
        let idle = in_flight
            .get(&self.key)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2);
        if idle {
            in_flight.remove(&self.key);
        }
    }
}

/// Keyed in-memory cache with per-key in-flight locks.
///
/// Clones share storage. Writes are last-write-wins; values stored under one
/// key are expected to be equal, so a duplicate write is harmless.
pub struct LookupCache<V> {
    /// Cache name used in log lines
    name: &'static str,

    /// Internal cache storage
    entries: Arc<RwLock<HashMap<String, V>>>,

    /// Locks held while a key is being fetched
    in_flight: InFlight,

    hits: Arc<AtomicUsize>,
    misses: Arc<AtomicUsize>,

    /// Whether caching is enabled
    enabled: bool,
}

impl<V: Clone> LookupCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self::with_enabled(name, true)
    }

    /// Create a cache that never stores anything when `enabled` is false
    pub fn with_enabled(name: &'static str, enabled: bool) -> Self {
        Self {
            name,
            entries: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            enabled,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        if !self.enabled {
            return None;
        }

        match self.entries.read().get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("{} cache hit for '{}'", self.name, key);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("{} cache miss for '{}'", self.name, key);
                None
            }
        }
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        if !self.enabled {
            return;
        }

        let key = key.into();
        debug!("{} cache store for '{}'", self.name, key);
        self.entries.write().insert(key, value);
    }

    /// Whether a value is stored under `key`, without touching the counters
    pub fn contains(&self, key: &str) -> bool {
        self.enabled && self.entries.read().contains_key(key)
    }

    /// Take the in-flight lock for `key`.
    ///
    /// Callers that miss take this lock, check the cache again, and only then
    /// go to the network, so concurrent misses on one key fetch once.
    pub async fn lock_key(&self, key: &str) -> KeyLock {
        let lock = {
            let mut in_flight = self.in_flight.lock();
            in_flight
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = lock.clone().lock_owned().await;

        KeyLock {
            key: key.to_string(),
            lock,
            guard: Some(guard),
            in_flight: self.in_flight.clone(),
        }
    }

    /// Number of keys with a fetch in flight
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.lock().len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.entries.write().clear();
        self.in_flight.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        debug!("{} cache cleared", self.name);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<V> Clone for LookupCache<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            entries: self.entries.clone(),
            in_flight: self.in_flight.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}

impl<V> std::fmt::Debug for LookupCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupCache")
            .field("name", &self.name)
            .field("entries", &self.entries.read().len())
            .field("enabled", &self.enabled)
            .finish()
    }
}
