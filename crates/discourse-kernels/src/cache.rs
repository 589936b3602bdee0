//! Memoization cache shared by recursive kernel calls.
//!
//! Entries are keyed by the full argument tuple of a kernel call and are
//! write-once: a value stored for a key is never replaced, only evicted.
//! When the cache is full the least recently used entry is dropped.
//!
//! A cache is an explicit collaborator: kernel engines hold an
//! `Arc<MemoCache<..>>` that callers may share, inspect, or clear. For
//! callers that do not care, [`MemoCache::global`] hands out one lazily
//! created process-wide cache per key/value type.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Default number of entries a cache holds before evicting.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Memo cache configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: usize,
}

impl CacheConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Set capacity
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(KernelError::invalid_parameter(
                "capacity",
                capacity,
                "cache capacity must be positive",
            ));
        }
        self.capacity = capacity;
        Ok(self)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of entries dropped to make room
    pub evictions: usize,
    /// Number of entries currently held
    pub current_size: usize,
    /// Largest size seen since the last clear
    pub peak_size: usize,
}

impl CacheStats {
    /// Get hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    last_access: u64,
}

/// Entries plus a recency index ordered by access tick.
#[derive(Debug)]
struct LruState<K, V> {
    entries: HashMap<K, Entry<V>>,
    recency: BTreeMap<u64, K>,
    clock: u64,
    stats: CacheStats,
}

impl<K, V> LruState<K, V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Capacity-bounded LRU cache safe for concurrent use.
///
/// # Example
///
/// ```rust
/// use discourse_kernels::{CacheConfig, MemoCache};
///
/// let cache: MemoCache<(String, usize), u64> =
///     MemoCache::new(CacheConfig::new().with_capacity(2).unwrap());
///
/// cache.insert(("bar".to_string(), 2), 2);
/// assert_eq!(cache.get(&("bar".to_string(), 2)), Some(2));
/// assert_eq!(cache.stats().hits, 1);
/// ```
#[derive(Debug)]
pub struct MemoCache<K, V> {
    config: CacheConfig,
    state: Mutex<LruState<K, V>>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LruState::new()),
        }
    }

    /// Create an empty cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::new(CacheConfig::new().with_capacity(capacity)?))
    }

    /// Look up a value and mark it as most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let tick = state.tick();

        match state.entries.get_mut(key) {
            Some(entry) => {
                state.recency.remove(&entry.last_access);
                entry.last_access = tick;
                state.recency.insert(tick, key.clone());
                state.stats.hits += 1;
                tracing::trace!(hits = state.stats.hits, "memo cache hit");
                Some(entry.value.clone())
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    /// Store a value unless the key is already present.
    ///
    /// Returns the value held by the cache afterwards, which is the earlier
    /// one if another caller got there first.
    pub fn insert(&self, key: K, value: V) -> V {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let tick = state.tick();

        if let Some(entry) = state.entries.get_mut(&key) {
            state.recency.remove(&entry.last_access);
            entry.last_access = tick;
            state.recency.insert(tick, key);
            return entry.value.clone();
        }

        if state.entries.len() >= self.config.capacity {
            if let Some((_, oldest)) = state.recency.pop_first() {
                state.entries.remove(&oldest);
                state.stats.evictions += 1;
                tracing::trace!(
                    evictions = state.stats.evictions,
                    "memo cache evicted least recently used entry"
                );
            }
        }

        state.entries.insert(
            key.clone(),
            Entry {
                value: value.clone(),
                last_access: tick,
            },
        );
        state.recency.insert(tick, key);
        state.stats.current_size = state.entries.len();
        state.stats.peak_size = state.stats.peak_size.max(state.stats.current_size);
        value
    }

    /// Return the cached value or compute, store and return it.
    ///
    /// The lock is not held while `compute` runs, so `compute` may itself
    /// consult the cache.
    pub fn get_or_try_insert_with<F>(&self, key: K, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        Ok(self.insert(key, value))
    }

    /// Whether a key is cached (does not touch recency or statistics)
    pub fn contains(&self, key: &K) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.recency.clear();
        state.stats = CacheStats::default();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats.clone()
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }
}

type Registry = Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// The process-wide cache for this key/value type.
    ///
    /// Created with the default configuration on first use and shared by
    /// every later caller until the process exits. Call [`MemoCache::clear`]
    /// for deterministic measurements.
    pub fn global() -> Arc<Self> {
        let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
        let mut caches = registry.lock();
        let shared = caches
            .entry(TypeId::of::<Self>())
            .or_insert_with(|| {
                Arc::new(Self::new(CacheConfig::default())) as Arc<dyn Any + Send + Sync>
            });

        // The registry is keyed by the concrete type, so the downcast holds.
        Arc::clone(shared)
            .downcast::<Self>()
            .unwrap_or_else(|_| Arc::new(Self::new(CacheConfig::default())))
    }
}
