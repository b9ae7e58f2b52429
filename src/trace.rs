//! Trace-level logging hook.
//!
//! Expands to a `tracing::trace!` event when the `tracing` feature is on and
//! to nothing otherwise, so hot paths pay nothing in a bare build.

macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(target: "chain_hashmap", $($tt)*)
        }
    };
}

pub(crate) use trace;
