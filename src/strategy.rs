use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use ahash::RandomState;

/// The key-handling operations a [`Table`](crate::Table) is parameterized by.
///
/// The table and its buckets never look at a key except through these five
/// methods. Two contracts are not checked:
///
/// - `compare` must be a deterministic strict total order.
/// - Keys that compare equal must hash to the same slot, since uniqueness
///   is only enforced inside a bucket.
///
/// Behaviour under a strategy that breaks either contract is undefined (the
/// table stays memory safe, but outcomes and levels are meaningless).
pub trait KeyStrategy {
    type Key;

    /// Slot index for `key`; must lie in `[0, 2^bit_width)`.
    fn hash(&self, key: &Self::Key, bit_width: u32) -> usize;

    /// An independent copy of `key` for the table to own.
    fn clone_key(&self, key: &Self::Key) -> Self::Key;

    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering;

    /// Releases a key previously produced by `clone_key`. Called exactly once
    /// per stored key, at removal or teardown.
    fn destroy(&self, key: Self::Key);

    fn print(&self, key: &Self::Key, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// A strategy made of five plain function pointers.
pub struct FnStrategy<K> {
    pub clone: fn(&K) -> K,
    pub hash: fn(&K, u32) -> usize,
    pub compare: fn(&K, &K) -> Ordering,
    pub destroy: fn(K),
    pub print: fn(&K, &mut dyn fmt::Write) -> fmt::Result,
}

impl<K> FnStrategy<K> {
    pub fn new(
        clone: fn(&K) -> K,
        hash: fn(&K, u32) -> usize,
        compare: fn(&K, &K) -> Ordering,
        destroy: fn(K),
        print: fn(&K, &mut dyn fmt::Write) -> fmt::Result,
    ) -> Self {
        FnStrategy { clone, hash, compare, destroy, print }
    }
}

impl<K> KeyStrategy for FnStrategy<K> {
    type Key = K;

    #[inline(always)]
    fn hash(&self, key: &K, bit_width: u32) -> usize {
        (self.hash)(key, bit_width)
    }

    #[inline(always)]
    fn clone_key(&self, key: &K) -> K {
        (self.clone)(key)
    }

    #[inline(always)]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.compare)(a, b)
    }

    #[inline(always)]
    fn destroy(&self, key: K) {
        (self.destroy)(key)
    }

    #[inline(always)]
    fn print(&self, key: &K, out: &mut dyn fmt::Write) -> fmt::Result {
        (self.print)(key, out)
    }
}

// Fixed seeds keep slot assignment stable across runs, so dumps are reproducible.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Strategy for any `Hash + Ord + Clone + Display` key, hashing with ahash.
pub struct OrdStrategy<K> {
    state: RandomState,
    _marker: PhantomData<fn(K) -> K>,
}

impl<K> Default for OrdStrategy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OrdStrategy<K> {
    pub fn new() -> Self {
        OrdStrategy {
            state: RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]),
            _marker: PhantomData,
        }
    }
}

impl<K: Hash + Ord + Clone + fmt::Display> KeyStrategy for OrdStrategy<K> {
    type Key = K;

    #[inline(always)]
    fn hash(&self, key: &K, bit_width: u32) -> usize {
        let h = self.state.hash_one(key);
        (h & ((1u64 << bit_width) - 1)) as usize
    }

    #[inline(always)]
    fn clone_key(&self, key: &K) -> K {
        key.clone()
    }

    #[inline(always)]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }

    #[inline(always)]
    fn destroy(&self, key: K) {
        drop(key);
    }

    fn print(&self, key: &K, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{key}")
    }
}
