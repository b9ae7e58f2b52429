//! Circular doubly-linked list threaded through live entries.
//!
//! Links are kept beside the entry arena in a `SecondaryMap` keyed by the
//! same `EntryKey` handles, so the core table's entries carry no ordering
//! state. The list closes on a header sentinel that is never an entry:
//! `header.after` is the eldest entry and `header.before` the newest.

use slotmap::SecondaryMap;

use crate::raw::EntryKey;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Link {
    Header,
    Entry(EntryKey),
}

impl Link {
    #[inline]
    fn entry(self) -> Option<EntryKey> {
        match self {
            Link::Header => None,
            Link::Entry(k) => Some(k),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Links {
    before: Link,
    after: Link,
}

impl Links {
    const EMPTY: Links = Links {
        before: Link::Header,
        after: Link::Header,
    };
}

#[derive(Clone, Debug)]
pub(crate) struct OrderList {
    header: Links,
    links: SecondaryMap<EntryKey, Links>,
}

impl OrderList {
    pub(crate) fn new() -> Self {
        Self {
            header: Links::EMPTY,
            links: SecondaryMap::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            header: Links::EMPTY,
            links: SecondaryMap::with_capacity(capacity),
        }
    }

    fn links_mut(&mut self, link: Link) -> &mut Links {
        match link {
            Link::Header => &mut self.header,
            Link::Entry(k) => &mut self.links[k],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    /// Links `entry` immediately before the header, making it the newest.
    pub(crate) fn push_back(&mut self, entry: EntryKey) {
        let before = self.header.before;
        self.links.insert(
            entry,
            Links {
                before,
                after: Link::Header,
            },
        );
        self.links_mut(before).after = Link::Entry(entry);
        self.header.before = Link::Entry(entry);
    }

    /// Splices `entry` out, joining its neighbours. Returns false if it was
    /// not linked.
    pub(crate) fn unlink(&mut self, entry: EntryKey) -> bool {
        let Some(Links { before, after }) = self.links.remove(entry) else {
            return false;
        };
        self.links_mut(before).after = after;
        self.links_mut(after).before = before;
        true
    }

    pub(crate) fn move_to_back(&mut self, entry: EntryKey) {
        if self.header.before == Link::Entry(entry) {
            return;
        }
        if self.unlink(entry) {
            self.push_back(entry);
        }
    }

    pub(crate) fn first(&self) -> Option<EntryKey> {
        self.header.after.entry()
    }

    pub(crate) fn last(&self) -> Option<EntryKey> {
        self.header.before.entry()
    }

    pub(crate) fn after(&self, entry: EntryKey) -> Option<EntryKey> {
        self.links.get(entry)?.after.entry()
    }

    pub(crate) fn clear(&mut self) {
        self.links.clear();
        self.header = Links::EMPTY;
    }

    /// Entry handles from eldest to newest.
    pub(crate) fn iter(&self) -> OrderIter<'_> {
        OrderIter {
            list: self,
            cur: self.header.after,
        }
    }
}

pub(crate) struct OrderIter<'a> {
    list: &'a OrderList,
    cur: Link,
}

impl Iterator for OrderIter<'_> {
    type Item = EntryKey;

    fn next(&mut self) -> Option<EntryKey> {
        let k = self.cur.entry()?;
        self.cur = self.list.links[k].after;
        Some(k)
    }
}
