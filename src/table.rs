//!
//! Scalable hash table
//! -------------------
//! A fixed-size chained hash table whose buckets are partitioned into lock stripes.
//! Bucket `b` lives in stripe `b % nlocks`, and each stripe is guarded by its own
//! `parking_lot::RwLock`, so writers touching different stripes never contend.
//!
//! Mutations (`insert`, `upsert`, `erase`) take the stripe lock internally. Reads
//! are split in two: `lock_for` hands out the stripe lock for a probe entry, and
//! `find` searches a stripe the caller already holds. The table never resizes;
//! capacity and load factor only decide the bucket count up front.
//!

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use parking_lot::RwLock;

pub const DEFAULT_CAPACITY: usize = 1024 * 1024;
pub const DEFAULT_LOAD_FACTOR: f64 = 2.0;
pub const DEFAULT_NLOCKS: usize = 256;

/// The buckets owned by one lock stripe.
pub struct Stripe<T> {
    index: usize,
    buckets: Vec<Vec<T>>,
}

impl<T> Stripe<T> {
    /// Stripe position within the table.
    pub fn index(&self) -> usize { self.index }

    /// Entries currently held across this stripe's buckets.
    pub fn len(&self) -> usize { self.buckets.iter().map(Vec::len).sum() }

    pub fn is_empty(&self) -> bool { self.buckets.iter().all(Vec::is_empty) }
}

pub struct ScalableHashTable<T, S = RandomState> {
    stripes: Box<[RwLock<Stripe<T>>]>,
    nbuckets: usize,
    hasher: S,
}

impl<T: Hash + Eq> ScalableHashTable<T> {
    pub fn new() -> Self { Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, DEFAULT_NLOCKS) }

    pub fn with_capacity(capacity: usize, load_factor: f64, nlocks: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, load_factor, nlocks, RandomState::new())
    }
}

impl<T: Hash + Eq> Default for ScalableHashTable<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Hash + Eq, S: BuildHasher> ScalableHashTable<T, S> {
    pub fn with_capacity_and_hasher(capacity: usize, load_factor: f64, nlocks: usize, hasher: S) -> Self {
        assert!(load_factor > 0.0, "load factor must be positive");
        let nbuckets = ((capacity as f64 / load_factor) as usize).max(1);
        // Never more stripes than buckets, otherwise some locks guard nothing.
        let nlocks = nlocks.clamp(1, nbuckets);
        let stripes = (0..nlocks)
            .map(|index| {
                // Buckets index, index + nlocks, index + 2*nlocks, ...
                let owned = (nbuckets - index).div_ceil(nlocks);
                RwLock::new(Stripe { index, buckets: (0..owned).map(|_| Vec::new()).collect() })
            })
            .collect();
        Self { stripes, nbuckets, hasher }
    }

    pub fn bucket_count(&self) -> usize { self.nbuckets }
    pub fn stripe_count(&self) -> usize { self.stripes.len() }

    /// (stripe index, bucket slot inside that stripe) for an entry.
    fn locate(&self, t: &T) -> (usize, usize) {
        let bucket = (self.hasher.hash_one(t) % self.nbuckets as u64) as usize;
        let nlocks = self.stripes.len();
        (bucket % nlocks, bucket / nlocks)
    }

    /// Add `t` unless an equal entry is already present. Returns false on a duplicate.
    pub fn insert(&self, t: T) -> bool {
        let (stripe, slot) = self.locate(&t);
        let mut w = self.stripes[stripe].write();
        let bucket = &mut w.buckets[slot];
        if bucket.iter().any(|e| *e == t) { return false; }
        bucket.push(t);
        true
    }

    /// Add `t`, replacing and returning an equal entry if one exists.
    pub fn upsert(&self, t: T) -> Option<T> {
        let (stripe, slot) = self.locate(&t);
        let mut w = self.stripes[stripe].write();
        let bucket = &mut w.buckets[slot];
        match bucket.iter_mut().find(|e| **e == t) {
            Some(existing) => Some(std::mem::replace(existing, t)),
            None => { bucket.push(t); None }
        }
    }

    /// Remove the entry equal to `probe`, returning it.
    pub fn erase(&self, probe: &T) -> Option<T> {
        let (stripe, slot) = self.locate(probe);
        let mut w = self.stripes[stripe].write();
        let bucket = &mut w.buckets[slot];
        let pos = bucket.iter().position(|e| e == probe)?;
        Some(bucket.swap_remove(pos))
    }

    /// Lock guarding the stripe `probe` hashes into.
    pub fn lock_for(&self, probe: &T) -> &RwLock<Stripe<T>> {
        let (stripe, _) = self.locate(probe);
        &self.stripes[stripe]
    }

    /// Search a stripe the caller has locked through [`Self::lock_for`].
    ///
    /// Panics if `stripe` is not the one that owns `probe`'s bucket.
    pub fn find<'a>(&self, stripe: &'a Stripe<T>, probe: &T) -> Option<&'a T> {
        let (index, slot) = self.locate(probe);
        assert_eq!(stripe.index, index, "stripe {} does not own this entry (expected {})", stripe.index, index);
        stripe.buckets[slot].iter().find(|e| *e == probe)
    }

    pub fn len(&self) -> usize { self.stripes.iter().map(|s| s.read().len()).sum() }
    pub fn is_empty(&self) -> bool { self.stripes.iter().all(|s| s.read().is_empty()) }
}
