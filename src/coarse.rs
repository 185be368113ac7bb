use std::collections::HashMap as StdHashMap;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::map::KeyValueMap;

/// A `HashMap` behind one reader-writer lock covering the whole structure.
///
/// Writers (insert, erase) are fully serialized; readers share the lock with each
/// other but never overlap a writer. This is the baseline the sharded map is
/// measured against.
pub struct CoarseLockMap<K, V> {
    map: RwLock<StdHashMap<K, V>>,
}

impl<K: Eq + Hash, V> CoarseLockMap<K, V> {
    pub fn new() -> Self { Self { map: RwLock::new(StdHashMap::new()) } }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { map: RwLock::new(StdHashMap::with_capacity(capacity)) }
    }

    pub fn len(&self) -> usize { self.map.read().len() }
    pub fn is_empty(&self) -> bool { self.map.read().is_empty() }
    pub fn clear(&self) { self.map.write().clear(); }
}

impl<K: Eq + Hash, V> Default for CoarseLockMap<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K, V> KeyValueMap<K, V> for CoarseLockMap<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn insert(&self, key: K, value: V) -> bool {
        let mut w = self.map.write();
        w.insert(key, value);
        true
    }

    fn erase(&self, key: &K) -> bool { self.map.write().remove(key).is_some() }

    fn lookup(&self, key: &K) -> Option<V> { self.map.read().get(key).cloned() }

    fn name(&self) -> &'static str { "coarse-lock map" }
}
