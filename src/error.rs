//! Error types surfaced by construction and by cursors.

use core::fmt;

/// Rejected construction parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Load factor was zero, negative, NaN or infinite.
    IllegalLoadFactor(f32),
    /// Capacity ceiling was zero, not a power of two, or above
    /// [`MAXIMUM_CAPACITY`](crate::MAXIMUM_CAPACITY).
    IllegalMaximumCapacity(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IllegalLoadFactor(lf) => write!(f, "illegal load factor: {lf}"),
            ConfigError::IllegalMaximumCapacity(cap) => {
                write!(f, "illegal maximum capacity: {cap}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Misuse detected by a [`Cursor`](crate::Cursor).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IterError {
    /// The map was structurally modified after the cursor's snapshot by some
    /// route other than the cursor's own `remove`. Detection is best-effort.
    ConcurrentModification,
    /// `remove` was called before any `next_*`, or twice for the same element.
    IllegalState,
}

impl fmt::Display for IterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterError::ConcurrentModification => {
                f.write_str("map was structurally modified during iteration")
            }
            IterError::IllegalState => {
                f.write_str("cursor remove without a preceding next")
            }
        }
    }
}

impl std::error::Error for IterError {}
