//! View iterators over a map's live storage.
//!
//! Two flavours share the same entry walk:
//! - [`Iter`], [`Keys`] and [`Values`] borrow the map, so the borrow checker
//!   rules out mutation while they are alive.
//! - [`Cursor`] holds no borrow. It snapshots the map's modification count
//!   when created and re-checks it on every step, failing fast with
//!   [`IterError::ConcurrentModification`] when the map changed through any
//!   route other than the cursor's own `remove`.

use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::error::IterError;
use crate::raw::{EntryKey, ModCount, RawTable, Walk};

/// Iterator over `(&K, &V)` pairs.
pub struct Iter<'a, K, V, S> {
    table: &'a RawTable<K, V, S>,
    walk: Walk<'a>,
    next: Option<EntryKey>,
    remaining: usize,
}

impl<'a, K, V, S> Iter<'a, K, V, S> {
    pub(crate) fn new(table: &'a RawTable<K, V, S>, walk: Walk<'a>) -> Self {
        Self {
            table,
            walk,
            next: walk.first(table),
            remaining: table.len(),
        }
    }
}

impl<K, V, S> Clone for Iter<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            walk: self.walk,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = self.walk.successor(self.table, entry);
        self.remaining = self.remaining.saturating_sub(1);
        let node = self.table.node(entry)?;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> ExactSizeIterator for Iter<'_, K, V, S> {}
impl<K, V, S> FusedIterator for Iter<'_, K, V, S> {}

/// Iterator over keys.
pub struct Keys<'a, K, V, S> {
    pub(crate) inner: Iter<'a, K, V, S>,
}

impl<'a, K, V, S> Iterator for Keys<'a, K, V, S> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S> ExactSizeIterator for Keys<'_, K, V, S> {}
impl<K, V, S> FusedIterator for Keys<'_, K, V, S> {}

/// Iterator over values.
pub struct Values<'a, K, V, S> {
    pub(crate) inner: Iter<'a, K, V, S>,
}

impl<'a, K, V, S> Iterator for Values<'a, K, V, S> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S> ExactSizeIterator for Values<'_, K, V, S> {}
impl<K, V, S> FusedIterator for Values<'_, K, V, S> {}

/// Owning iterator, in the map's iteration order.
pub struct IntoIter<K, V> {
    pub(crate) inner: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Cursor state independent of the map type.
#[derive(Clone, Debug)]
pub(crate) struct RawCursor {
    expected: ModCount,
    next: Option<EntryKey>,
    last: Option<EntryKey>,
}

impl RawCursor {
    pub(crate) fn start<K, V, S>(table: &RawTable<K, V, S>, walk: Walk<'_>) -> Self {
        Self {
            expected: table.mod_count(),
            next: walk.first(table),
            last: None,
        }
    }

    #[inline]
    pub(crate) fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn check<K, V, S>(&self, table: &RawTable<K, V, S>) -> Result<(), IterError> {
        if table.mod_count() != self.expected {
            return Err(IterError::ConcurrentModification);
        }
        Ok(())
    }

    /// Steps past the next entry and returns it, or `None` at the end.
    pub(crate) fn advance<K, V, S>(
        &mut self,
        table: &RawTable<K, V, S>,
        walk: Walk<'_>,
    ) -> Result<Option<EntryKey>, IterError> {
        self.check(table)?;
        let Some(entry) = self.next else {
            return Ok(None);
        };
        self.next = walk.successor(table, entry);
        self.last = Some(entry);
        Ok(Some(entry))
    }

    /// Hands out the last returned entry for removal, at most once.
    pub(crate) fn take_last<K, V, S>(
        &mut self,
        table: &RawTable<K, V, S>,
    ) -> Result<EntryKey, IterError> {
        if self.last.is_none() {
            return Err(IterError::IllegalState);
        }
        self.check(table)?;
        self.last.take().ok_or(IterError::IllegalState)
    }

    /// Adopts the map's count after a removal made through this cursor.
    pub(crate) fn resync<K, V, S>(&mut self, table: &RawTable<K, V, S>) {
        self.expected = table.mod_count();
    }
}

/// A detached, fail-fast iteration position over a map of type `M`.
///
/// Obtained from [`HashMap::cursor`](crate::HashMap::cursor) or
/// [`LinkedHashMap::cursor`](crate::LinkedHashMap::cursor). Every step takes
/// the map as an argument and must be given the map the cursor came from.
///
/// ```
/// use chain_hashmap::{IterError, LinkedHashMap};
///
/// let mut m = LinkedHashMap::new();
/// m.insert(1, "one");
/// m.insert(2, "two");
///
/// let mut cursor = m.cursor();
/// assert_eq!(cursor.next_key(&m), Ok(Some(&1)));
/// assert_eq!(cursor.remove(&mut m), Ok((1, "one")));
/// assert_eq!(cursor.remove(&mut m), Err(IterError::IllegalState));
///
/// m.insert(3, "three");
/// assert_eq!(cursor.next_key(&m), Err(IterError::ConcurrentModification));
/// ```
pub struct Cursor<M> {
    pub(crate) raw: RawCursor,
    _map: PhantomData<fn(&M)>,
}

impl<M> Cursor<M> {
    pub(crate) fn new(raw: RawCursor) -> Self {
        Self {
            raw,
            _map: PhantomData,
        }
    }

    /// True while an unvisited entry remains. Does not check for
    /// modification.
    pub fn has_next(&self) -> bool {
        self.raw.has_next()
    }
}

impl<M> Clone for Cursor<M> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone())
    }
}

impl<M> core::fmt::Debug for Cursor<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("has_next", &self.raw.has_next())
            .finish_non_exhaustive()
    }
}
