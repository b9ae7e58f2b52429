//! chain-hashmap: a separately chained hash map with an optional ordering
//! overlay for insertion-ordered maps and LRU caches.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a power-of-two bucket table with chained collision resolution,
//!   amortized growth and fail-fast cursors, plus a linked overlay that
//!   keeps entries in insertion or access order without touching the core
//!   table's logic.
//! - Layers:
//!   - HashEngine<S>: folds the user hasher's output to 32 bits, optionally
//!     XORs in a random seed, and applies a supplemental bit spread so that
//!     hash codes differing only in high bits still land in different
//!     buckets.
//!   - RawTable<K, V, S>: entry arena (a `SlotMap` of nodes addressed by
//!     generational `EntryKey`s), bucket array of chain heads, size,
//!     threshold and modification count. Reports what each insert did
//!     (`InsertOutcome`) instead of calling back into an overlay.
//!   - HashMap<K, V, S>: public unordered map; walks buckets.
//!   - LinkedHashMap<K, V, S, E>: public ordered map; owns an `OrderList`
//!     (a header-sentinel ring in a `SecondaryMap` beside the arena) and an
//!     `EvictionPolicy`; walks the list.
//!
//! Constraints
//! - Single-threaded. No interior mutability, no unsafe.
//! - Bucket count is zero or a power of two and never exceeds the
//!   configured ceiling (`MAXIMUM_CAPACITY` by default).
//! - Each entry caches its spread hash; `K: Hash` runs again only when a
//!   resize switches the hash seed on or off.
//! - Resizing doubles the table once `len >= threshold` and the new key's
//!   bucket is already occupied. New entries go to the head of their chain.
//! - An ordered map's list holds exactly the live entries, eldest first.
//!
//! Fail-fast iteration
//! - Borrowing iterators (`iter`, `keys`, `values`) cannot observe
//!   mutation; the borrow checker forbids it.
//! - `Cursor` holds no borrow. It records the modification count when
//!   created and rejects any step after a structural change made by
//!   anything but its own `remove`. Value replacement is not structural.
//!   In access order a successful `get` is, so a read between two cursor
//!   steps fails the next step.
//!
//! Notes and non-goals
//! - No concurrent access, no persistence, no open addressing.
//! - Keys and values are opaque; equality and hashing come from
//!   `K: Eq + Hash` and the `BuildHasher`. A key type whose `Eq` and `Hash`
//!   disagree produces duplicate or unreachable entries but never memory
//!   unsafety.
//! - An absent key is modelled as an ordinary key, e.g. `Option<K>`.
//!
//! Logging
//! - With the default `tracing` feature, table inflation, resize, hash
//!   seed switches, saturation, clear and eviction emit `TRACE` events
//!   under the `chain_hashmap` target.

mod bucket;
mod config;
mod error;
mod eviction;
mod hash_engine;
mod hash_map;
mod linked_hash_map;
mod order;
mod raw;
mod raw_proptest;
mod trace;
mod view;

/// Default `BuildHasher` for both maps.
pub type DefaultHashBuilder = hashbrown::hash_map::DefaultHashBuilder;

// Public surface
pub use config::{
    MapConfig, OrderMode, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY,
};
pub use error::{ConfigError, IterError};
pub use eviction::{Bounded, EvictionPolicy, NeverEvict};
pub use hash_map::HashMap;
pub use linked_hash_map::{LinkedHashMap, LruCache};
pub use raw::ChainStats;
pub use view::{Cursor, IntoIter, Iter, Keys, Values};
