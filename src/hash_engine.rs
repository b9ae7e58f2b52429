//! Hash Engine: turns a key into a bucket index.
//!
//! The raw hash comes from the map's `BuildHasher`, folded to 32 bits. It is
//! then spread with a fixed shift/xor sequence so that codes differing only
//! in their high bits still land in different low-order buckets. Bucket
//! counts are always powers of two, which makes `hash & (capacity - 1)` a
//! valid modulus; lookup and resize both depend on that.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

use crate::trace::trace;

/// Bit-spreading transform applied to every raw hash code.
#[inline]
pub(crate) fn spread(h: u32) -> u32 {
    let h = h ^ (h >> 20) ^ (h >> 12);
    h ^ (h >> 7) ^ (h >> 4)
}

/// Bucket index of `hash` in a table of `capacity` buckets.
#[inline]
pub(crate) fn index_for(hash: u32, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    hash as usize & (capacity - 1)
}

/// Smallest power of two `>= n`, saturating at `max` (itself a power of two).
pub(crate) fn round_up_to_power_of_two(n: usize, max: usize) -> usize {
    if n >= max {
        max
    } else {
        n.max(1).next_power_of_two()
    }
}

#[inline]
fn fold(raw: u64) -> u32 {
    (raw ^ (raw >> 32)) as u32
}

fn random_seed() -> u32 {
    // Never zero: zero means "seeding off".
    fold(RandomState::new().hash_one(0x9e37_79b9_u32)) | 1
}

/// Hasher state for one table: the user's `BuildHasher` plus the optional
/// alternative-hashing seed.
#[derive(Clone)]
pub(crate) struct HashEngine<S> {
    build_hasher: S,
    seed: u32,
    alt_threshold: usize,
}

impl<S: BuildHasher> HashEngine<S> {
    pub(crate) fn new(build_hasher: S, alt_threshold: usize) -> Self {
        Self {
            build_hasher,
            seed: 0,
            alt_threshold,
        }
    }

    /// Spread hash of `key`, the value stored in each entry.
    #[inline]
    pub(crate) fn hash<Q>(&self, key: &Q) -> u32
    where
        Q: ?Sized + Hash,
    {
        spread(self.seed ^ fold(self.build_hasher.hash_one(key)))
    }

    /// Switches the seed on or off for a table about to have `capacity`
    /// buckets. Returns true when it changed, in which case every stored hash
    /// is stale and must be recomputed.
    pub(crate) fn reseed_for(&mut self, capacity: usize) -> bool {
        let seeded = self.seed != 0;
        let wanted = capacity >= self.alt_threshold;
        if seeded == wanted {
            return false;
        }
        self.seed = if wanted { random_seed() } else { 0 };
        trace!(capacity, seeded = wanted, "hash seed switched");
        true
    }

    pub(crate) fn build_hasher(&self) -> &S {
        &self.build_hasher
    }

    #[cfg(test)]
    pub(crate) fn is_seeded(&self) -> bool {
        self.seed != 0
    }
}
