//! HashMap: the unordered public map over [`RawTable`].
//!
//! Iteration walks the bucket array, so the order is unspecified and may
//! change on any resize.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use crate::config::{MapConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::error::{ConfigError, IterError};
use crate::raw::{ChainStats, InsertOutcome, RawTable, Walk};
use crate::view::{Cursor, IntoIter, Iter, Keys, RawCursor, Values};
use crate::DefaultHashBuilder;

/// A hash map with separate chaining.
///
/// ```
/// use chain_hashmap::HashMap;
///
/// let mut m = HashMap::new();
/// assert_eq!(m.insert("a", 1), None);
/// assert_eq!(m.insert("a", 2), Some(1));
/// assert_eq!(m.get("a"), Some(&2));
/// assert_eq!(m.remove("a"), Some(2));
/// assert!(m.is_empty());
/// ```
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: RawTable<K, V, S>,
}

impl<K, V> HashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Map whose first allocation holds at least `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_table(RawTable::from_valid(
            MapConfig::new().initial_capacity(capacity),
            Default::default(),
        ))
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
        Self::with_config_and_hasher(config, Default::default())
    }

    /// Copies every pair of `source` into a map sized to hold them without
    /// resizing. Later duplicates overwrite earlier ones.
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
        for (k, v) in pairs {
            table.insert_for_create(k, v);
        }
        Self::from_table(table)
    }
}

/// Bucket request for a copy of `len` mappings at the default load factor.
pub(crate) fn copy_capacity(len: usize) -> usize {
    ((len as f64 / DEFAULT_LOAD_FACTOR as f64) as usize + 1).max(DEFAULT_INITIAL_CAPACITY)
}

impl<K, V> Default for HashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    fn from_table(table: RawTable<K, V, S>) -> Self {
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Current bucket count; zero until the first insert.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Entry count past which the next colliding insert doubles the table.
    pub fn threshold(&self) -> usize {
        self.table.threshold()
    }

    pub fn chain_stats(&self) -> ChainStats {
        self.table.chain_stats()
    }

    /// Removes every entry, keeping the bucket allocation.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter::new(&self.table, Walk::Buckets)
    }

    pub fn keys(&self) -> Keys<'_, K, V, S> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, S> {
        Values { inner: self.iter() }
    }

    /// Starts a fail-fast cursor at the first entry.
    pub fn cursor(&self) -> Cursor<Self> {
        Cursor::new(RawCursor::start(&self.table, Walk::Buckets))
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::from_table(RawTable::from_valid(MapConfig::new(), hash_builder))
    }

    pub fn with_config_and_hasher(config: MapConfig, hash_builder: S) -> Result<Self, ConfigError> {
        RawTable::new(config, hash_builder).map(Self::from_table)
    }

    pub fn hasher(&self) -> &S {
        self.table.build_hasher()
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.table.find(k)?;
        self.table.node(entry).map(|n| &n.value)
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.table.find(k)?;
        self.table.node(entry).map(|n| (&n.key, &n.value))
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.table.find(k)?;
        self.table.node_mut(entry).map(|n| &mut n.value)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find(k).is_some()
    }

    /// Scans every bucket.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.contains_value(value, Walk::Buckets)
    }

    /// True if `k` maps to a value equal to `value`.
    pub fn contains_entry<Q>(&self, k: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        self.get(k) == Some(value)
    }

    /// Maps `key` to `value`, returning the previous value. Replacing a value
    /// is not a structural modification.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.table.insert(key, value, Walk::Buckets) {
            InsertOutcome::Replaced { old, .. } => Some(old),
            InsertOutcome::Created(_) => None,
        }
    }

    /// Inserts every pair, pre-sizing the table from the source's lower size
    /// bound.
    pub fn put_all<I>(&mut self, source: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iter = source.into_iter();
        self.table.reserve_for_bulk(iter.size_hint().0, Walk::Buckets);
        for (k, v) in iter {
            self.insert(k, v);
        }
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
        self.table.remove(k).map(|(_, key, value)| (key, value))
    }

    /// Removes `k` only if it currently maps to a value equal to `value`.
    pub fn remove_mapping<Q>(&mut self, k: &Q, value: &V) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        self.table
            .remove_mapping(k, value)
            .map(|(_, key, value)| (key, value))
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &RawTable<K, V, S> {
        &self.table
    }
}

impl<K, V, S> Cursor<HashMap<K, V, S>> {
    /// Returns the next entry, or `None` once every entry was visited.
    pub fn next_entry<'m>(
        &mut self,
        map: &'m HashMap<K, V, S>,
    ) -> Result<Option<(&'m K, &'m V)>, IterError> {
        let Some(entry) = self.raw.advance(&map.table, Walk::Buckets)? else {
            return Ok(None);
        };
        Ok(map.table.node(entry).map(|n| (&n.key, &n.value)))
    }

    pub fn next_key<'m>(&mut self, map: &'m HashMap<K, V, S>) -> Result<Option<&'m K>, IterError> {
        Ok(self.next_entry(map)?.map(|(k, _)| k))
    }

    pub fn next_value<'m>(
        &mut self,
        map: &'m HashMap<K, V, S>,
    ) -> Result<Option<&'m V>, IterError> {
        Ok(self.next_entry(map)?.map(|(_, v)| v))
    }

    /// Removes the entry most recently returned, through the map's own
    /// removal path, and keeps the cursor valid.
    pub fn remove(&mut self, map: &mut HashMap<K, V, S>) -> Result<(K, V), IterError>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        let entry = self.raw.take_last(&map.table)?;
        let removed = map.table.remove_entry(entry);
        self.raw.resync(&map.table);
        removed.ok_or(IterError::ConcurrentModification)
    }
}

impl<K, V, S> Clone for HashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut table = self.table.clone_empty();
        for (k, v) in self.iter() {
            table.insert_for_create(k.clone(), v.clone());
        }
        Self::from_table(table)
    }
}

impl<K, V, S> fmt::Debug for HashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_pairs(Walk::Buckets).into_iter(),
        }
    }
}
