//! Construction parameters shared by [`HashMap`](crate::HashMap) and
//! [`LinkedHashMap`](crate::LinkedHashMap).

use crate::error::ConfigError;

/// Bucket count used when none is requested.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1 << 4;

/// Load factor used when none is requested.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Largest bucket array a table will ever allocate. Past this point the
/// table stops resizing and chains simply grow longer.
pub const MAXIMUM_CAPACITY: usize = 1 << 30;

/// Iteration order of a [`LinkedHashMap`](crate::LinkedHashMap), fixed at
/// construction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum OrderMode {
    /// Oldest insertion first. Re-inserting an existing key keeps its place.
    #[default]
    Insertion,
    /// Least recently read or written first. Every successful lookup or value
    /// replacement moves the entry to the back and counts as a structural
    /// modification for cursors.
    Access,
}

/// Sizing and hashing parameters.
///
/// ```
/// use chain_hashmap::{HashMap, MapConfig};
///
/// let config = MapConfig::new().initial_capacity(100).load_factor(0.5);
/// let map: HashMap<u32, u32> = HashMap::with_config(config).unwrap();
/// assert_eq!(map.load_factor(), 0.5);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub(crate) initial_capacity: usize,
    pub(crate) load_factor: f32,
    pub(crate) maximum_capacity: usize,
    pub(crate) alt_hashing_threshold: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MapConfig {
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            maximum_capacity: MAXIMUM_CAPACITY,
            alt_hashing_threshold: usize::MAX,
        }
    }

    /// Requested bucket count for the first allocation. Rounded up to a power
    /// of two and clamped to the maximum capacity.
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Ratio of entries to buckets that triggers a doubling.
    pub const fn load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Ceiling on the bucket count. Must be a power of two no larger than
    /// [`MAXIMUM_CAPACITY`].
    pub const fn maximum_capacity(mut self, capacity: usize) -> Self {
        self.maximum_capacity = capacity;
        self
    }

    /// Bucket count at which a random seed starts being mixed into every
    /// key's hash. `usize::MAX` (the default) never switches it on.
    pub const fn alt_hashing_threshold(mut self, capacity: usize) -> Self {
        self.alt_hashing_threshold = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lf = self.load_factor;
        if !lf.is_finite() || lf <= 0.0 {
            return Err(ConfigError::IllegalLoadFactor(lf));
        }
        let max = self.maximum_capacity;
        if !max.is_power_of_two() || max > MAXIMUM_CAPACITY {
            return Err(ConfigError::IllegalMaximumCapacity(max));
        }
        Ok(())
    }

    /// Initial capacity after clamping to the ceiling; this doubles as the
    /// threshold of a not-yet-inflated table.
    pub(crate) fn clamped_initial_capacity(&self) -> usize {
        self.initial_capacity.min(self.maximum_capacity)
    }
}
