use std::hash::{Hash, Hasher};

use crate::map::KeyValueMap;
use crate::table::ScalableHashTable;

/// Entry stored in the scalable table. Hashing and equality look at the key only,
/// so a node with an empty value works as a lookup probe.
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    pub key: K,
    pub val: V,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, val: V) -> Self { Self { key, val } }
}

impl<K: Clone, V: Default> Node<K, V> {
    fn probe(key: &K) -> Self { Self { key: key.clone(), val: V::default() } }
}

impl<K: PartialEq, V> PartialEq for Node<K, V> {
    fn eq(&self, other: &Self) -> bool { self.key == other.key }
}

impl<K: Eq, V> Eq for Node<K, V> {}

impl<K: Hash, V> Hash for Node<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.key.hash(state); }
}

/// Map backed by [`ScalableHashTable`]: per-stripe locking instead of one global lock.
///
/// Insert and erase lean entirely on the table's internal stripe locks. Lookup
/// takes the stripe lock explicitly through the table's lock accessor and then
/// runs the table's unsynchronized find while holding it.
pub struct ShardedMap<K, V> {
    table: ScalableHashTable<Node<K, V>>,
}

impl<K: Hash + Eq, V> ShardedMap<K, V> {
    pub fn new() -> Self { Self { table: ScalableHashTable::new() } }

    pub fn with_table(table: ScalableHashTable<Node<K, V>>) -> Self { Self { table } }

    pub fn table(&self) -> &ScalableHashTable<Node<K, V>> { &self.table }

    pub fn len(&self) -> usize { self.table.len() }
    pub fn is_empty(&self) -> bool { self.table.is_empty() }
}

impl<K: Hash + Eq, V> Default for ShardedMap<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K, V> KeyValueMap<K, V> for ShardedMap<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Default + Send + Sync,
{
    fn insert(&self, key: K, value: V) -> bool {
        self.table.upsert(Node::new(key, value));
        true
    }

    fn erase(&self, key: &K) -> bool { self.table.erase(&Node::probe(key)).is_some() }

    fn lookup(&self, key: &K) -> Option<V> {
        let probe = Node::probe(key);
        let stripe = self.table.lock_for(&probe).read();
        let found = self.table.find(&stripe, &probe).map(|n| n.val.clone());
        drop(stripe);
        found
    }

    fn name(&self) -> &'static str { "sharded hash map" }
}
