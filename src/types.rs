use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::utils::HandyRwLock;

/// Shared, interior-mutable handle. Type alias, not a new type -- methods
/// live on the target, not on `Pod` itself.
pub type Pod<T> = Arc<RwLock<T>>;

/// A `HashMap` behind a single `RwLock`, exposing the `wl()`/`rl()` idiom
/// directly so callers rarely need to spell out the lock type.
///
/// The teacher's later commits (`btree::page_cache::PageCache`,
/// `concurrent_status::ConcurrentStatus`) reference a `types::ConcurrentHashMap`
/// of this same shape, but its body was filtered out of the retrieved
/// snapshot -- rebuilt here from its call sites (`get_inner().rl()/.wl()`,
/// `.keys()`, `.remove()`, `.clear()`).
pub struct ConcurrentMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_inner_rl(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.inner.rl()
    }

    pub fn get_inner_wl(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.inner.wl()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.rl().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.rl().contains_key(key)
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.wl().insert(key, value);
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.wl().remove(key)
    }

    pub fn clear(&self) {
        self.inner.wl().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.rl().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<K> {
        self.inner.rl().keys().cloned().collect()
    }
}

pub type DbResult<T> = crate::error::DbResult<T>;
