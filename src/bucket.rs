//! Bucket Array: one chain head per slot.
//!
//! The array never changes length in place; a resize builds a new one and
//! relinks every entry into it. A table that has not seen its first insert
//! holds a zero-length placeholder.

use crate::hash_engine::index_for;
use crate::raw::EntryKey;

#[derive(Clone, Debug)]
pub(crate) struct BucketArray {
    heads: Box<[Option<EntryKey>]>,
}

impl BucketArray {
    pub(crate) fn unallocated() -> Self {
        Self {
            heads: Box::new([]),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            heads: vec![None; capacity].into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn is_unallocated(&self) -> bool {
        self.heads.is_empty()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn index_for(&self, hash: u32) -> usize {
        index_for(hash, self.heads.len())
    }

    #[inline]
    pub(crate) fn head(&self, index: usize) -> Option<EntryKey> {
        self.heads[index]
    }

    #[inline]
    pub(crate) fn set_head(&mut self, index: usize, head: Option<EntryKey>) {
        self.heads[index] = head;
    }

    /// First chain head at or after `from`, scanning upward.
    pub(crate) fn first_occupied(&self, from: usize) -> Option<EntryKey> {
        self.heads.get(from..)?.iter().flatten().next().copied()
    }

    pub(crate) fn occupied(&self) -> usize {
        self.heads.iter().filter(|h| h.is_some()).count()
    }

    /// Empties every slot, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.heads.fill(None);
    }
}
