//! Eviction policies for [`LinkedHashMap`](crate::LinkedHashMap).
//!
//! After each insert that creates a new entry, the map asks its policy
//! whether to drop the eldest entry (front of the order list). The policy is
//! consulted exactly once per such insert, after the new entry is linked
//! into both its bucket chain and the order list.

/// Decides whether the eldest entry should be removed.
///
/// Any `FnMut(usize, &K, &V) -> bool` closure is a policy; it receives the
/// map's length (including the entry just inserted) and the eldest entry.
///
/// ```
/// use chain_hashmap::{LinkedHashMap, OrderMode};
///
/// // Keep at most three entries, and drop an eldest value of 100 or more.
/// let mut m = LinkedHashMap::with_policy(OrderMode::Insertion, |len: usize, _k: &&str, v: &u32| {
///     len > 3 || *v >= 100
/// });
/// m.insert("a", 1);
/// m.insert("b", 2);
/// m.insert("c", 3);
/// m.insert("d", 4);
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["b", "c", "d"]);
/// ```
pub trait EvictionPolicy<K, V> {
    fn should_evict(&mut self, len: usize, eldest_key: &K, eldest_value: &V) -> bool;
}

/// Never evicts. The default policy.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NeverEvict;

impl<K, V> EvictionPolicy<K, V> for NeverEvict {
    #[inline]
    fn should_evict(&mut self, _len: usize, _eldest_key: &K, _eldest_value: &V) -> bool {
        false
    }
}

/// Evicts once the map holds more than `capacity` entries. Combined with
/// [`OrderMode::Access`](crate::OrderMode::Access) this is an LRU cache.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Bounded {
    capacity: usize,
}

impl Bounded {
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> EvictionPolicy<K, V> for Bounded {
    #[inline]
    fn should_evict(&mut self, len: usize, _eldest_key: &K, _eldest_value: &V) -> bool {
        len > self.capacity
    }
}

impl<K, V, F> EvictionPolicy<K, V> for F
where
    F: FnMut(usize, &K, &V) -> bool,
{
    #[inline]
    fn should_evict(&mut self, len: usize, eldest_key: &K, eldest_value: &V) -> bool {
        self(len, eldest_key, eldest_value)
    }
}
