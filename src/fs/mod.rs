//! Filesystem utilities for omnirender.
//!
//! Output is always written atomically so the consuming server never reads a
//! partially rendered configuration.

pub mod atomic;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
