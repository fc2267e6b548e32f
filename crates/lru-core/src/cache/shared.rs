//! Lock-guarded cache handle for use across threads

use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use super::lru::LruCache;
use super::stats::CacheStats;
use crate::config::CacheConfig;
use crate::error::CoreError;

/// Cloneable handle to one [`LruCache`] behind a single exclusive lock
///
/// Every operation, including `get`, takes the lock because a hit reorders
/// the cache. Values are cloned out so no reference outlives the guard.
pub struct SharedLruCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        Ok(Self::from_cache(LruCache::new(capacity)?))
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self, CoreError> {
        Ok(Self::from_cache(LruCache::from_config(config)?))
    }

    pub fn from_cache(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Run `f` with the lock held, for read-modify-write sequences
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<K, V> SharedLruCache<K, V> {
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}
