//! Per-seed LRU cache for expensive world state.
//!
//! Terrain models and river systems are built once per seed and shared between chunk
//! requests. The index lock is held only to find or insert a slot; the build itself
//! runs outside it, and concurrent requests for the same seed wait on the slot's
//! `OnceLock` so the value is built exactly once.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// Cache statistics for monitoring
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of evictions
    pub evictions: usize,
    /// Seeds currently cached
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Hits: {} | Misses: {} | Rate: {:.1}% | Evictions: {} | Seeds: {}",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.evictions,
            self.entries
        )
    }
}

type Slot<T> = Arc<OnceLock<Arc<T>>>;

struct LruIndex<T> {
    slots: HashMap<i64, Slot<T>>,
    /// LRU order (most recent at back)
    lru_order: VecDeque<i64>,
    max_size: usize,
    stats: CacheStats,
}

impl<T> LruIndex<T> {
    fn touch(&mut self, seed: i64) {
        self.lru_order.retain(|k| *k != seed);
        self.lru_order.push_back(seed);
    }

    fn slot(&mut self, seed: i64) -> Slot<T> {
        if let Some(slot) = self.slots.get(&seed).cloned() {
            self.stats.hits += 1;
            self.touch(seed);
            return slot;
        }

        self.stats.misses += 1;
        if self.slots.len() >= self.max_size {
            if let Some(old) = self.lru_order.pop_front() {
                self.slots.remove(&old);
                self.stats.evictions += 1;
                log::debug!("evicted seed {old} from cache");
            }
        }
        let slot: Slot<T> = Arc::new(OnceLock::new());
        self.slots.insert(seed, Arc::clone(&slot));
        self.touch(seed);
        slot
    }
}

/// Bounded, thread-safe map from seed to a lazily built shared value.
pub struct SeedCache<T> {
    index: Mutex<LruIndex<T>>,
}

impl<T> SeedCache<T> {
    /// Cache holding at most `max_size` seeds (at least one).
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            index: Mutex::new(LruIndex {
                slots: HashMap::with_capacity(max_size),
                lru_order: VecDeque::with_capacity(max_size),
                max_size,
                stats: CacheStats::default(),
            }),
        }
    }

    /// Cached value for `seed`, building it with `build` on first use.
    ///
    /// An evicted entry stays alive for callers that already hold it; a later request
    /// for the same seed builds a fresh one.
    pub fn get_or_build<F>(&self, seed: i64, build: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        let slot = self.index.lock().slot(seed);
        Arc::clone(slot.get_or_init(|| Arc::new(build())))
    }

    /// Drop every cached value. Statistics are kept.
    pub fn clear(&self) {
        let mut index = self.index.lock();
        index.slots.clear();
        index.lru_order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let index = self.index.lock();
        CacheStats { entries: index.slots.len(), ..index.stats }
    }

    pub fn contains(&self, seed: i64) -> bool {
        self.index.lock().slots.contains_key(&seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_builds_once_per_seed() {
        let cache = SeedCache::new(4);
        let builds = AtomicUsize::new(0);
        let build = |v: u32| {
            builds.fetch_add(1, Ordering::SeqCst);
            v
        };
        let a = cache.get_or_build(1, || build(10));
        let b = cache.get_or_build(1, || build(20));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, 10);
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[test]
    fn test_lru_eviction() {
        let cache = SeedCache::new(2);
        cache.get_or_build(1, || 1);
        cache.get_or_build(2, || 2);
        cache.get_or_build(1, || 1);
        cache.get_or_build(3, || 3);

        assert!(cache.contains(1));
        assert!(!cache.contains(2));
        assert!(cache.contains(3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_clear_forces_rebuild() {
        let cache = SeedCache::new(2);
        let first = cache.get_or_build(5, || String::from("first"));
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
        let second = cache.get_or_build(5, || String::from("second"));
        assert_eq!(*first, "first");
        assert_eq!(*second, "second");
    }

    #[test]
    fn test_concurrent_requests_share_one_build() {
        let cache = SeedCache::new(4);
        let builds = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    cache.get_or_build(42, || {
                        builds.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(20));
                        42u64
                    })
                });
            }
        });
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }
}
