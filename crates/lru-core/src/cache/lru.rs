//! Fixed-capacity least-recently-used cache

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, info};

use super::list::RecencyList;
use super::stats::CacheStats;
use crate::config::CacheConfig;
use crate::error::CoreError;

/// Upper bound on slots reserved up front; larger caches grow on demand
const MAX_PREALLOCATED_SLOTS: usize = 4096;

/// A key/value cache holding at most `capacity` entries
///
/// Lookups and inserts are O(1): the index maps each key to its slot in a
/// [`RecencyList`], so touching an entry is a relink rather than a scan.
/// When an insert would exceed capacity, the least recently used entry is
/// evicted first.
pub struct LruCache<K, V> {
    capacity: usize,
    index: HashMap<K, usize>,
    order: RecencyList<K, V>,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty cache
    ///
    /// Fails with [`CoreError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::InvalidCapacity(0));
        }

        info!("Initializing LRU cache (capacity: {})", capacity);

        let reserved = capacity.min(MAX_PREALLOCATED_SLOTS);
        Ok(Self {
            capacity,
            index: HashMap::with_capacity(reserved),
            order: RecencyList::with_capacity(reserved),
            stats: CacheStats::default(),
        })
    }

    /// Create an empty cache sized by `config`
    pub fn from_config(config: &CacheConfig) -> Result<Self, CoreError> {
        Self::new(config.validated_capacity()?)
    }

    /// Look up `key`, marking it most recently used on a hit
    ///
    /// A miss leaves the recency order untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&slot) => {
                self.stats.record_hit();
                self.order.move_to_front(slot);
                self.order.value(slot)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert or update `key`
    ///
    /// An existing key keeps its slot and only moves to the front. A new key
    /// at full capacity first evicts the least recently used entry.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&slot) = self.index.get(&key) {
            if let Some(stored) = self.order.value_mut(slot) {
                *stored = value;
            }
            self.order.move_to_front(slot);
            return;
        }

        if self.order.len() >= self.capacity {
            self.evict();
        }

        let slot = self.order.push_front(key.clone(), value);
        self.index.insert(key, slot);
    }

    /// Read `key` without changing its recency or the statistics
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &slot = self.index.get(key)?;
        self.order.value(slot)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Drop `key` from the cache, returning its value if it was present
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.remove(key)?;
        self.order.remove(slot).map(|(_, value)| value)
    }

    /// Drop every entry; capacity and statistics are kept
    pub fn clear(&mut self) {
        debug!("Clearing {} cache entries", self.order.len());
        self.index.clear();
        self.order.clear();
    }

    /// Entries from most to least recently used
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + '_ {
        self.order.iter()
    }

    fn evict(&mut self) {
        if let Some((key, _)) = self.order.pop_back() {
            self.index.remove(&key);
            self.stats.record_eviction();
            debug!(
                "Evicted least recently used entry ({} of {} slots in use)",
                self.order.len(),
                self.capacity
            );
        }
    }
}

impl<K, V> LruCache<K, V> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.order.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(cache: &LruCache<i32, i32>) -> Vec<i32> {
        cache.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = LruCache::<i32, i32>::new(0);
        assert_eq!(result.unwrap_err(), CoreError::InvalidCapacity(0));
    }

    #[test]
    fn test_from_config_rejects_negative_capacity() {
        let config = CacheConfig { capacity: -5 };
        let result = LruCache::<i32, i32>::from_config(&config);
        assert_eq!(result.unwrap_err(), CoreError::InvalidCapacity(-5));
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = LruCache::<i32, i32>::new(3).unwrap();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn test_reference_scenario() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.get(&1), Some(&1));

        cache.put(3, 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);

        cache.put(4, 4);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some(&3));
        assert_eq!(cache.get(&4), Some(&4));

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 3);
        assert_eq!(stats.miss_count, 2);
        assert_eq!(stats.eviction_count, 2);
    }

    #[test]
    fn test_update_does_not_evict() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, 10);
        cache.put(2, 20);

        cache.put(1, 11);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().eviction_count, 0);
        assert_eq!(keys(&cache), vec![1, 2]);
        assert_eq!(cache.peek(&1), Some(&11));
        assert_eq!(cache.peek(&2), Some(&20));
    }

    #[test]
    fn test_update_moves_key_to_front() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, 10);
        cache.put(2, 20);
        cache.put(1, 11);

        // 2 is now the least recently used
        cache.put(3, 30);
        assert!(!cache.contains(&2));
        assert_eq!(keys(&cache), vec![3, 1]);
    }

    #[test]
    fn test_miss_does_not_perturb_order() {
        let mut cache = LruCache::new(3).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        let before = keys(&cache);

        assert_eq!(cache.get(&42), None);
        assert_eq!(keys(&cache), before);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().miss_count, 1);
    }

    #[test]
    fn test_peek_does_not_touch_recency() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);

        assert_eq!(cache.peek(&1), Some(&1));
        cache.put(3, 3);
        assert!(!cache.contains(&1));
        assert_eq!(cache.stats().hit_count, 0);
    }

    #[test]
    fn test_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(&2));
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut cache: LruCache<String, usize> = LruCache::new(2).unwrap();
        cache.put("alpha".to_string(), 1);
        assert_eq!(cache.get("alpha"), Some(&1));
        assert!(cache.contains("alpha"));
        assert_eq!(cache.remove("alpha"), Some(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_frees_room_without_eviction() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);

        assert_eq!(cache.remove(&1), Some(1));
        assert_eq!(cache.remove(&1), None);
        cache.put(3, 3);

        assert_eq!(keys(&cache), vec![3, 2]);
        assert_eq!(cache.stats().eviction_count, 0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);

        cache.put(3, 3);
        cache.put(4, 4);
        cache.put(5, 5);
        assert_eq!(keys(&cache), vec![5, 4]);
    }

    #[test]
    fn test_large_capacity_does_not_preallocate_everything() {
        let mut cache = LruCache::new(usize::MAX).unwrap();
        cache.put(1, 1);
        assert_eq!(cache.len(), 1);
    }

    /// Naive reference: a vector ordered most recent first
    struct Model {
        capacity: usize,
        entries: Vec<(i32, i32)>,
    }

    impl Model {
        fn get(&mut self, key: i32) -> Option<i32> {
            let pos = self.entries.iter().position(|(k, _)| *k == key)?;
            let entry = self.entries.remove(pos);
            self.entries.insert(0, entry);
            Some(entry.1)
        }

        fn put(&mut self, key: i32, value: i32) -> Option<i32> {
            if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
                self.entries.remove(pos);
                self.entries.insert(0, (key, value));
                return None;
            }
            let evicted = if self.entries.len() == self.capacity {
                self.entries.pop().map(|(k, _)| k)
            } else {
                None
            };
            self.entries.insert(0, (key, value));
            evicted
        }
    }

    #[test]
    fn test_matches_reference_model() {
        // Small LCG keeps the sequence deterministic across runs
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: u64| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (seed >> 33) % bound
        };

        for capacity in 1..=6 {
            let mut cache = LruCache::new(capacity).unwrap();
            let mut model = Model {
                capacity,
                entries: Vec::new(),
            };

            for step in 0..2_000 {
                let key = next(10) as i32;
                if next(2) == 0 {
                    let before = cache.len();
                    let order = keys(&cache);
                    let expected = model.get(key);
                    assert_eq!(cache.get(&key).copied(), expected, "step {step}");
                    if expected.is_none() {
                        assert_eq!(cache.len(), before);
                        assert_eq!(keys(&cache), order);
                    }
                } else {
                    let value = step;
                    let present = cache.contains(&key);
                    let len_before = cache.len();
                    let evictions_before = cache.stats().eviction_count;
                    let evicted = model.put(key, value);
                    cache.put(key, value);

                    if present {
                        assert_eq!(cache.len(), len_before);
                        assert_eq!(cache.stats().eviction_count, evictions_before);
                    }
                    if let Some(evicted) = evicted {
                        assert!(!cache.contains(&evicted));
                        assert_eq!(cache.stats().eviction_count, evictions_before + 1);
                    }
                }

                assert!(cache.len() <= capacity);
                let expected: Vec<(i32, i32)> = model.entries.clone();
                let actual: Vec<(i32, i32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(actual, expected, "capacity {capacity}, step {step}");
                assert_eq!(cache.index.len(), cache.len());
            }
        }
    }
}
