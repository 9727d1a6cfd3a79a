//! Project configuration for omnirender.
//!
//! This module defines the Config struct that represents `omnirender.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! path resolution relative to the config file, and validation of values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{DEFAULT_CONFIG_FILE, FileMode};
