//! RawTable: the core chained hash table shared by both public maps.
//!
//! Entries live in a `SlotMap` arena and are addressed by generational
//! `EntryKey` handles. Each bucket holds the handle of its chain head; each
//! entry holds the handle of the next entry in its chain. The ordered map
//! keeps its own list beside the arena and tells the table how to walk
//! entries through [`Walk`].

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};

use slotmap::SlotMap;

use crate::bucket::BucketArray;
use crate::config::MapConfig;
use crate::error::ConfigError;
use crate::hash_engine::{round_up_to_power_of_two, HashEngine};
use crate::order::OrderList;
use crate::trace::trace;

slotmap::new_key_type! {
    /// Stable handle of one entry in the arena.
    pub(crate) struct EntryKey;
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Spread hash as of the last rehash.
    pub(crate) hash: u32,
    pub(crate) next: Option<EntryKey>,
}

/// Count of structural modifications, snapshotted by cursors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ModCount(u64);

impl ModCount {
    #[inline]
    pub(crate) fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// How to enumerate live entries: by scanning the bucket array, or by
/// following an order list. Resize redistribution uses the same choice.
#[derive(Copy, Clone)]
pub(crate) enum Walk<'a> {
    Buckets,
    Order(&'a OrderList),
}

impl Walk<'_> {
    pub(crate) fn first<K, V, S>(self, table: &RawTable<K, V, S>) -> Option<EntryKey> {
        match self {
            Walk::Buckets => table.buckets.first_occupied(0),
            Walk::Order(list) => list.first(),
        }
    }

    pub(crate) fn successor<K, V, S>(
        self,
        table: &RawTable<K, V, S>,
        entry: EntryKey,
    ) -> Option<EntryKey> {
        match self {
            Walk::Buckets => {
                let node = table.nodes.get(entry)?;
                node.next.or_else(|| {
                    let index = table.buckets.index_for(node.hash);
                    table.buckets.first_occupied(index + 1)
                })
            }
            Walk::Order(list) => list.after(entry),
        }
    }
}

/// What `insert` did with the key.
pub(crate) enum InsertOutcome<V> {
    /// The key was present; its value was swapped in place.
    Replaced { entry: EntryKey, old: V },
    /// A new entry was linked at the head of its bucket.
    Created(EntryKey),
}

/// Snapshot of bucket usage, for observing resize and hash quality.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChainStats {
    /// Allocated bucket count (zero before the first insert).
    pub buckets: usize,
    /// Buckets holding at least one entry.
    pub occupied: usize,
    /// Entries in the longest chain.
    pub longest_chain: usize,
}

pub(crate) struct RawTable<K, V, S> {
    engine: HashEngine<S>,
    buckets: BucketArray,
    nodes: SlotMap<EntryKey, Node<K, V>>,
    load_factor: f32,
    /// Resize trigger. Before inflation it holds the requested capacity.
    threshold: usize,
    max_capacity: usize,
    mod_count: ModCount,
}

impl<K, V, S> RawTable<K, V, S> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn mod_count(&self) -> ModCount {
        self.mod_count
    }

    /// Records a structural change that the table itself cannot see, such as
    /// an access-order move.
    #[inline]
    pub(crate) fn bump_mod_count(&mut self) {
        self.mod_count.bump();
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    pub(crate) fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub(crate) fn threshold(&self) -> usize {
        self.threshold
    }

    #[inline]
    pub(crate) fn node(&self, entry: EntryKey) -> Option<&Node<K, V>> {
        self.nodes.get(entry)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, entry: EntryKey) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(entry)
    }

    pub(crate) fn chain_stats(&self) -> ChainStats {
        let mut longest_chain = 0;
        for index in 0..self.buckets.capacity() {
            let mut len = 0;
            let mut cur = self.buckets.head(index);
            while let Some(k) = cur {
                len += 1;
                cur = self.nodes[k].next;
            }
            longest_chain = longest_chain.max(len);
        }
        ChainStats {
            buckets: self.buckets.capacity(),
            occupied: self.buckets.occupied(),
            longest_chain,
        }
    }

    /// Drops every entry. Counts as one modification regardless of size.
    pub(crate) fn clear(&mut self) {
        self.mod_count.bump();
        self.buckets.clear();
        self.nodes.clear();
        trace!(capacity = self.buckets.capacity(), "table cleared");
    }

    /// Consumes the table, yielding pairs in `walk` order.
    pub(crate) fn into_pairs(mut self, walk: Walk<'_>) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cur = walk.first(&self);
        while let Some(k) = cur {
            order.push(k);
            cur = walk.successor(&self, k);
        }
        order
            .into_iter()
            .filter_map(|k| self.nodes.remove(k))
            .map(|n| (n.key, n.value))
            .collect()
    }
}

impl<K, V, S> RawTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn new(config: MapConfig, build_hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config, build_hasher))
    }

    /// Builds from a config already known to be valid.
    pub(crate) fn from_valid(config: MapConfig, build_hasher: S) -> Self {
        debug_assert!(config.validate().is_ok());
        Self {
            engine: HashEngine::new(build_hasher, config.alt_hashing_threshold),
            buckets: BucketArray::unallocated(),
            nodes: SlotMap::with_key(),
            load_factor: config.load_factor,
            threshold: config.clamped_initial_capacity(),
            max_capacity: config.maximum_capacity,
            mod_count: ModCount::default(),
        }
    }

    pub(crate) fn build_hasher(&self) -> &S {
        self.engine.build_hasher()
    }

    fn threshold_for(&self, capacity: usize) -> usize {
        let t = capacity as f64 * self.load_factor as f64;
        t.min((self.max_capacity + 1) as f64) as usize
    }

    /// Allocates the first bucket array, sized for `to_size` buckets.
    pub(crate) fn inflate(&mut self, to_size: usize) {
        let capacity = round_up_to_power_of_two(to_size, self.max_capacity);
        self.threshold = self.threshold_for(capacity);
        self.buckets = BucketArray::with_capacity(capacity);
        self.engine.reseed_for(capacity);
        trace!(capacity, threshold = self.threshold, "table inflated");
    }

    /// Moves every entry into a fresh array of `new_capacity` buckets, which
    /// counts as a structural modification. At the capacity ceiling this only
    /// disables further growth.
    pub(crate) fn resize(&mut self, new_capacity: usize, walk: Walk<'_>) {
        let old_capacity = self.buckets.capacity();
        if old_capacity == self.max_capacity {
            self.threshold = usize::MAX;
            trace!(capacity = old_capacity, "capacity saturated, resizing disabled");
            return;
        }
        self.mod_count.bump();
        let rehash = self.engine.reseed_for(new_capacity);
        let old = core::mem::replace(
            &mut self.buckets,
            BucketArray::with_capacity(new_capacity),
        );
        self.transfer(old, rehash, walk);
        self.threshold = self.threshold_for(new_capacity);
        trace!(
            old_capacity,
            new_capacity,
            rehash,
            len = self.nodes.len(),
            "table resized"
        );
    }

    fn transfer(&mut self, old: BucketArray, rehash: bool, walk: Walk<'_>) {
        match walk {
            Walk::Buckets => {
                for index in 0..old.capacity() {
                    let mut cur = old.head(index);
                    while let Some(entry) = cur {
                        // Read the successor before relinking overwrites it.
                        cur = self.nodes[entry].next;
                        self.relink(entry, rehash);
                    }
                }
            }
            Walk::Order(list) => {
                for entry in list.iter() {
                    self.relink(entry, rehash);
                }
            }
        }
    }

    /// Pushes `entry` onto the head of its chain in the current bucket array.
    fn relink(&mut self, entry: EntryKey, rehash: bool) {
        let node = &mut self.nodes[entry];
        if rehash {
            node.hash = self.engine.hash(&node.key);
        }
        let index = self.buckets.index_for(node.hash);
        node.next = self.buckets.head(index);
        self.buckets.set_head(index, Some(entry));
    }

    /// Handle of the entry whose key equals `q`.
    pub(crate) fn find<Q>(&self, q: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.nodes.is_empty() {
            return None;
        }
        let hash = self.engine.hash(q);
        self.find_in_chain(hash, q)
    }

    fn find_in_chain<Q>(&self, hash: u32, q: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.buckets.head(self.buckets.index_for(hash));
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.hash == hash && node.key.borrow() == q {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// Maps `key` to `value`. Replacing an existing value leaves the
    /// modification count alone; creating an entry bumps it and may double
    /// the bucket array first, redistributing entries in `walk` order.
    pub(crate) fn insert(&mut self, key: K, value: V, walk: Walk<'_>) -> InsertOutcome<V> {
        if self.buckets.is_unallocated() {
            self.inflate(self.threshold);
        }
        let hash = self.engine.hash(&key);
        if let Some(entry) = self.find_in_chain(hash, &key) {
            let old = core::mem::replace(&mut self.nodes[entry].value, value);
            return InsertOutcome::Replaced { entry, old };
        }
        self.mod_count.bump();
        InsertOutcome::Created(self.add_entry(hash, key, value, walk))
    }

    fn add_entry(&mut self, mut hash: u32, key: K, value: V, walk: Walk<'_>) -> EntryKey {
        let mut index = self.buckets.index_for(hash);
        if self.nodes.len() >= self.threshold && self.buckets.head(index).is_some() {
            self.resize(2 * self.buckets.capacity(), walk);
            hash = self.engine.hash(&key);
            index = self.buckets.index_for(hash);
        }
        self.create_entry(hash, key, value, index)
    }

    fn create_entry(&mut self, hash: u32, key: K, value: V, index: usize) -> EntryKey {
        let next = self.buckets.head(index);
        let entry = self.nodes.insert(Node {
            key,
            value,
            hash,
            next,
        });
        self.buckets.set_head(index, Some(entry));
        entry
    }

    /// Insert used while populating a fresh table: no modification count, no
    /// resize. Returns the handle only when an entry was created.
    pub(crate) fn insert_for_create(&mut self, key: K, value: V) -> Option<EntryKey> {
        let hash = self.engine.hash(&key);
        if let Some(entry) = self.find_in_chain(hash, &key) {
            self.nodes[entry].value = value;
            return None;
        }
        let index = self.buckets.index_for(hash);
        Some(self.create_entry(hash, key, value, index))
    }

    /// Pre-sizes the table for a bulk insert of `additional` mappings.
    pub(crate) fn reserve_for_bulk(&mut self, additional: usize, walk: Walk<'_>) {
        if additional == 0 {
            return;
        }
        if self.buckets.is_unallocated() {
            let wanted = (additional as f64 * self.load_factor as f64) as usize;
            self.inflate(wanted.max(self.threshold));
        }
        if additional > self.threshold {
            let target = ((additional as f64 / self.load_factor as f64) as usize)
                .saturating_add(1)
                .min(self.max_capacity);
            let mut new_capacity = self.buckets.capacity();
            while new_capacity < target {
                new_capacity <<= 1;
            }
            if new_capacity > self.buckets.capacity() {
                self.resize(new_capacity, walk);
            }
        }
    }

    /// Unlinks the first chain entry in `hash`'s bucket matching `pred`.
    fn unlink_where<F>(&mut self, hash: u32, mut pred: F) -> Option<(EntryKey, K, V)>
    where
        F: FnMut(EntryKey, &Node<K, V>) -> bool,
    {
        if self.nodes.is_empty() {
            return None;
        }
        let index = self.buckets.index_for(hash);
        let mut prev: Option<EntryKey> = None;
        let mut cur = self.buckets.head(index);
        while let Some(k) = cur {
            let node = &self.nodes[k];
            let next = node.next;
            if pred(k, node) {
                match prev {
                    Some(p) => self.nodes[p].next = next,
                    None => self.buckets.set_head(index, next),
                }
                self.mod_count.bump();
                return self.nodes.remove(k).map(|n| (k, n.key, n.value));
            }
            prev = cur;
            cur = next;
        }
        None
    }

    pub(crate) fn remove<Q>(&mut self, q: &Q) -> Option<(EntryKey, K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.engine.hash(q);
        self.unlink_where(hash, |_, n| n.hash == hash && n.key.borrow() == q)
    }

    /// Removes the entry only if `q` maps to a value equal to `value`.
    pub(crate) fn remove_mapping<Q>(&mut self, q: &Q, value: &V) -> Option<(EntryKey, K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        let hash = self.engine.hash(q);
        self.unlink_where(hash, |_, n| {
            n.hash == hash && n.key.borrow() == q && n.value == *value
        })
    }

    /// Removes the entry behind a handle through the same unlink path as a
    /// keyed removal.
    pub(crate) fn remove_entry(&mut self, entry: EntryKey) -> Option<(K, V)> {
        let hash = self.nodes.get(entry)?.hash;
        self.unlink_where(hash, |k, _| k == entry)
            .map(|(_, key, value)| (key, value))
    }

    pub(crate) fn contains_value(&self, value: &V, walk: Walk<'_>) -> bool
    where
        V: PartialEq,
    {
        let mut cur = walk.first(self);
        while let Some(k) = cur {
            if self.nodes[k].value == *value {
                return true;
            }
            cur = walk.successor(self, k);
        }
        false
    }

    /// Empty table with this one's hasher and load factor, inflated for a
    /// copy of the current contents.
    pub(crate) fn clone_empty(&self) -> Self
    where
        S: Clone,
    {
        let mut copy = Self {
            engine: self.engine.clone(),
            buckets: BucketArray::unallocated(),
            nodes: SlotMap::with_capacity_and_key(self.nodes.len()),
            load_factor: self.load_factor,
            threshold: self.threshold,
            max_capacity: self.max_capacity,
            mod_count: ModCount::default(),
        };
        if !self.buckets.is_unallocated() {
            let scale = (1.0 / self.load_factor as f64).min(4.0);
            let wanted = (self.nodes.len() as f64 * scale).min(self.max_capacity as f64) as usize;
            copy.inflate(wanted.min(self.buckets.capacity()));
        }
        copy
    }

    #[cfg(test)]
    pub(crate) fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.buckets.index_for(self.engine.hash(q))
    }

    #[cfg(test)]
    pub(crate) fn is_seeded(&self) -> bool {
        self.engine.is_seeded()
    }

    /// Every entry is reachable from the bucket its stored hash selects and
    /// that hash is current.
    #[cfg(test)]
    pub(crate) fn assert_chains_consistent(&self) {
        let mut seen = 0;
        for index in 0..self.buckets.capacity() {
            let mut cur = self.buckets.head(index);
            while let Some(k) = cur {
                let node = &self.nodes[k];
                assert_eq!(node.hash, self.engine.hash(&node.key), "stale hash");
                assert_eq!(self.buckets.index_for(node.hash), index, "wrong bucket");
                seen += 1;
                cur = node.next;
            }
        }
        assert_eq!(seen, self.nodes.len());
    }
}
