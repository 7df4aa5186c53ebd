//! Synchronization primitives used by [`crate::queue`] and [`crate::partition`].
//!
//! Every lock and thread handle in this crate goes through this module
//! instead of `std::sync`/`std::thread` directly, so the `loom` feature can
//! swap in loom's model-checked equivalents without touching call sites.
//! Ordinary builds (the default) just re-export the standard library;
//! nothing here changes behavior unless `--features loom` is set.

#[cfg(feature = "loom")]
pub use loom::sync::{Arc, Condvar, Mutex, MutexGuard};
#[cfg(feature = "loom")]
pub use loom::thread;

#[cfg(not(feature = "loom"))]
pub use std::sync::{Arc, Condvar, Mutex, MutexGuard};
#[cfg(not(feature = "loom"))]
pub use std::thread;
