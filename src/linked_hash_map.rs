//! LinkedHashMap: [`RawTable`] plus an order list and an eviction policy.
//!
//! The table stays unaware of ordering. This wrapper reacts to what each
//! table operation reports:
//! - a created entry is appended to the order list, then the policy is asked
//!   about the eldest entry;
//! - a replaced value, or a successful `get`, moves the entry to the back in
//!   access order and counts as a structural modification;
//! - a removed entry is unlinked from the list.
//!
//! Iteration, `contains_value` and resize redistribution all follow the list.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use crate::config::{MapConfig, OrderMode};
use crate::error::{ConfigError, IterError};
use crate::eviction::{Bounded, EvictionPolicy, NeverEvict};
use crate::hash_map::copy_capacity;
use crate::order::OrderList;
use crate::raw::{ChainStats, EntryKey, InsertOutcome, RawTable, Walk};
use crate::trace::trace;
use crate::view::{Cursor, IntoIter, Iter, Keys, RawCursor, Values};
use crate::DefaultHashBuilder;

/// A hash map that iterates in insertion or access order.
///
/// ```
/// use chain_hashmap::{LinkedHashMap, OrderMode};
///
/// let mut m = LinkedHashMap::with_mode(OrderMode::Access);
/// m.insert("a", 1);
/// m.insert("b", 2);
/// m.insert("c", 3);
/// m.get("a");
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["b", "c", "a"]);
/// ```
pub struct LinkedHashMap<K, V, S = DefaultHashBuilder, E = NeverEvict> {
    table: RawTable<K, V, S>,
    order: OrderList,
    mode: OrderMode,
    policy: E,
}

/// Access-ordered map that drops its least recently used entry once it holds
/// more than a fixed number of entries.
///
/// ```
/// use chain_hashmap::LruCache;
///
/// let mut cache = LruCache::lru(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get("a");
/// cache.insert("c", 3);
/// assert!(cache.contains_key("a"));
/// assert!(!cache.contains_key("b"));
/// ```
pub type LruCache<K, V, S = DefaultHashBuilder> = LinkedHashMap<K, V, S, Bounded>;

impl<K, V> LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty insertion-ordered map.
    pub fn new() -> Self {
        Self::with_mode(OrderMode::Insertion)
    }

    pub fn with_mode(mode: OrderMode) -> Self {
        Self::with_policy(mode, NeverEvict)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::assemble(
            RawTable::from_valid(
                MapConfig::new().initial_capacity(capacity),
                Default::default(),
            ),
            OrderMode::Insertion,
            NeverEvict,
        )
    }

    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f32,
    ) -> Result<Self, ConfigError> {
        Self::with_config(
            MapConfig::new()
                .initial_capacity(capacity)
                .load_factor(load_factor),
        )
    }

    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        Self::from_parts(config, OrderMode::Insertion, Default::default(), NeverEvict)
    }

    /// Insertion-ordered copy of `source`. A repeated key keeps its first
    /// position and its last value. No eviction runs while copying.
    pub fn from_map<I>(source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<(K, V)> = source.into_iter().collect();
        let mut table = RawTable::from_valid(
            MapConfig::new().initial_capacity(copy_capacity(pairs.len())),
            Default::default(),
        );
        let capacity = table.threshold();
        table.inflate(capacity);
        let mut order = OrderList::with_capacity(pairs.len());
        for (k, v) in pairs {
            if let Some(entry) = table.insert_for_create(k, v) {
                order.push_back(entry);
            }
        }
        Self {
            table,
            order,
            mode: OrderMode::Insertion,
            policy: NeverEvict,
        }
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::assemble(
            RawTable::from_valid(MapConfig::new(), hash_builder),
            OrderMode::Insertion,
            NeverEvict,
        )
    }

    pub fn with_config_and_hasher(config: MapConfig, hash_builder: S) -> Result<Self, ConfigError> {
        Self::from_parts(config, OrderMode::Insertion, hash_builder, NeverEvict)
    }
}

impl<K, V, E> LinkedHashMap<K, V, DefaultHashBuilder, E>
where
    K: Eq + Hash,
    E: EvictionPolicy<K, V>,
{
    pub fn with_policy(mode: OrderMode, policy: E) -> Self {
        Self::assemble(
            RawTable::from_valid(MapConfig::new(), Default::default()),
            mode,
            policy,
        )
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash,
{
    /// Access-ordered map holding at most `capacity` entries.
    pub fn lru(capacity: usize) -> Self {
        Self::with_policy(OrderMode::Access, Bounded::new(capacity))
    }
}

impl<K, V> Default for LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, E> LinkedHashMap<K, V, S, E> {
    fn assemble(table: RawTable<K, V, S>, mode: OrderMode, policy: E) -> Self {
        Self {
            table,
            order: OrderList::new(),
            mode,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    pub fn threshold(&self) -> usize {
        self.table.threshold()
    }

    pub fn chain_stats(&self) -> ChainStats {
        self.table.chain_stats()
    }

    pub fn order_mode(&self) -> OrderMode {
        self.mode
    }

    pub fn policy(&self) -> &E {
        &self.policy
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.order.clear();
    }

    fn entry_pair(&self, entry: Option<EntryKey>) -> Option<(&K, &V)> {
        self.table.node(entry?).map(|n| (&n.key, &n.value))
    }

    /// Front of the order: the oldest, or least recently used, entry.
    pub fn eldest(&self) -> Option<(&K, &V)> {
        self.entry_pair(self.order.first())
    }

    /// Back of the order.
    pub fn newest(&self) -> Option<(&K, &V)> {
        self.entry_pair(self.order.last())
    }

    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter::new(&self.table, Walk::Order(&self.order))
    }

    pub fn keys(&self) -> Keys<'_, K, V, S> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, S> {
        Values { inner: self.iter() }
    }

    /// Starts a fail-fast cursor at the eldest entry.
    pub fn cursor(&self) -> Cursor<Self> {
        Cursor::new(RawCursor::start(&self.table, Walk::Order(&self.order)))
    }

    /// Moves `entry` to the back in access order.
    fn record_access(&mut self, entry: EntryKey) {
        if self.mode == OrderMode::Access {
            self.table.bump_mod_count();
            self.order.move_to_back(entry);
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self)
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        self.table.assert_chains_consistent();
        assert_eq!(self.order.len(), self.table.len());
        for entry in self.order.iter() {
            assert!(self.table.node(entry).is_some(), "order list holds a dead entry");
        }
    }
}

impl<K, V, S, E> LinkedHashMap<K, V, S, E>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Map from explicit parts.
    ///
    /// ```
    /// use chain_hashmap::{Bounded, LinkedHashMap, MapConfig, OrderMode};
    /// use std::collections::hash_map::RandomState;
    ///
    /// let m: LinkedHashMap<u32, u32, _, _> = LinkedHashMap::from_parts(
    ///     MapConfig::new().initial_capacity(64),
    ///     OrderMode::Access,
    ///     RandomState::new(),
    ///     Bounded::new(32),
    /// )
    /// .unwrap();
    /// assert_eq!(m.policy().capacity(), 32);
    /// ```
    pub fn from_parts(
        config: MapConfig,
        mode: OrderMode,
        hash_builder: S,
        policy: E,
    ) -> Result<Self, ConfigError> {
        let table = RawTable::new(config, hash_builder)?;
        Ok(Self::assemble(table, mode, policy))
    }

    pub fn hasher(&self) -> &S {
        self.table.build_hasher()
    }

    /// Looks up `k`, recording the access in access order.
    pub fn get<Q>(&mut self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.table.find(k)?;
        self.record_access(entry);
        self.table.node(entry).map(|n| &n.value)
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.table.find(k)?;
        self.record_access(entry);
        self.table.node_mut(entry).map(|n| &mut n.value)
    }

    /// Looks up `k` without touching the order.
    pub fn peek<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entry_pair(self.table.find(k)).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entry_pair(self.table.find(k))
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find(k).is_some()
    }

    /// Walks the order list.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.contains_value(value, Walk::Order(&self.order))
    }

    pub fn contains_entry<Q>(&self, k: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        self.peek(k) == Some(value)
    }

    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (entry, key, value) = self.table.remove(k)?;
        self.order.unlink(entry);
        Some((key, value))
    }

    pub fn remove_mapping<Q>(&mut self, k: &Q, value: &V) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        let (entry, key, value) = self.table.remove_mapping(k, value)?;
        self.order.unlink(entry);
        Some((key, value))
    }

    /// Removes and returns the front of the order.
    pub fn pop_eldest(&mut self) -> Option<(K, V)> {
        let entry = self.order.first()?;
        self.remove_handle(entry)
    }

    fn remove_handle(&mut self, entry: EntryKey) -> Option<(K, V)> {
        let removed = self.table.remove_entry(entry)?;
        self.order.unlink(entry);
        Some(removed)
    }
}

impl<K, V, S, E> LinkedHashMap<K, V, S, E>
where
    K: Eq + Hash,
    S: BuildHasher,
    E: EvictionPolicy<K, V>,
{
    /// Maps `key` to `value`, returning the previous value.
    ///
    /// A new key is appended as the newest entry and the eviction policy is
    /// then consulted once. An existing key keeps its place in insertion
    /// order and moves to the back in access order.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.table.insert(key, value, Walk::Order(&self.order)) {
            InsertOutcome::Replaced { entry, old } => {
                self.record_access(entry);
                Some(old)
            }
            InsertOutcome::Created(entry) => {
                self.order.push_back(entry);
                self.evict_if_needed();
                None
            }
        }
    }

    fn evict_if_needed(&mut self) {
        let Some(eldest) = self.order.first() else {
            return;
        };
        let Some(node) = self.table.node(eldest) else {
            return;
        };
        if self.policy.should_evict(self.table.len(), &node.key, &node.value)
            && self.remove_handle(eldest).is_some()
        {
            trace!(len = self.table.len(), "evicted eldest entry");
        }
    }

    pub fn put_all<I>(&mut self, source: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iter = source.into_iter();
        self.table
            .reserve_for_bulk(iter.size_hint().0, Walk::Order(&self.order));
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S, E> Cursor<LinkedHashMap<K, V, S, E>> {
    pub fn next_entry<'m>(
        &mut self,
        map: &'m LinkedHashMap<K, V, S, E>,
    ) -> Result<Option<(&'m K, &'m V)>, IterError> {
        let Some(entry) = self.raw.advance(&map.table, Walk::Order(&map.order))? else {
            return Ok(None);
        };
        Ok(map.entry_pair(Some(entry)))
    }

    pub fn next_key<'m>(
        &mut self,
        map: &'m LinkedHashMap<K, V, S, E>,
    ) -> Result<Option<&'m K>, IterError> {
        Ok(self.next_entry(map)?.map(|(k, _)| k))
    }

    pub fn next_value<'m>(
        &mut self,
        map: &'m LinkedHashMap<K, V, S, E>,
    ) -> Result<Option<&'m V>, IterError> {
        Ok(self.next_entry(map)?.map(|(_, v)| v))
    }

    /// Removes the entry most recently returned from both the table and the
    /// order list.
    pub fn remove(&mut self, map: &mut LinkedHashMap<K, V, S, E>) -> Result<(K, V), IterError>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        let entry = self.raw.take_last(&map.table)?;
        let removed = map.remove_handle(entry);
        self.raw.resync(&map.table);
        removed.ok_or(IterError::ConcurrentModification)
    }
}

impl<K, V, S, E> Clone for LinkedHashMap<K, V, S, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        let mut table = self.table.clone_empty();
        let mut order = OrderList::with_capacity(self.len());
        for (k, v) in self.iter() {
            if let Some(entry) = table.insert_for_create(k.clone(), v.clone()) {
                order.push_back(entry);
            }
        }
        Self {
            table,
            order,
            mode: self.mode,
            policy: self.policy.clone(),
        }
    }
}

impl<K, V, S, E> fmt::Debug for LinkedHashMap<K, V, S, E>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, E> PartialEq for LinkedHashMap<K, V, S, E>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.peek(k) == Some(v))
    }
}

impl<K, V, S, E> Eq for LinkedHashMap<K, V, S, E>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V> FromIterator<(K, V)> for LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}

impl<K, V, S, E> Extend<(K, V)> for LinkedHashMap<K, V, S, E>
where
    K: Eq + Hash,
    S: BuildHasher,
    E: EvictionPolicy<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<'a, K, V, S, E> IntoIterator for &'a LinkedHashMap<K, V, S, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S, E> IntoIterator for LinkedHashMap<K, V, S, E> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let Self { table, order, .. } = self;
        IntoIter {
            inner: table.into_pairs(Walk::Order(&order)).into_iter(),
        }
    }
}
