//!
//! Key-value map capability
//! ------------------------
//! The contract every map under benchmark satisfies. Each implementation picks its
//! own locking discipline; the only requirement is that all three operations may be
//! called concurrently from any number of threads once the map is constructed.
//!

/// Insert / erase / lookup over a shared map.
pub trait KeyValueMap<K, V>: Send + Sync {
    /// Insert or overwrite `key`. Returns whether the map considers the write successful.
    fn insert(&self, key: K, value: V) -> bool;

    /// Remove `key`. True iff an entry existed and was removed.
    fn erase(&self, key: &K) -> bool;

    /// Copy of the value stored under `key`, if any.
    fn lookup(&self, key: &K) -> Option<V>;

    /// Short human-readable label used in reports.
    fn name(&self) -> &'static str;
}
