//! Config struct definition.

use super::types::FileMode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Project configuration for omnirender.
///
/// This struct represents the contents of `omnirender.yaml`. Every field is
/// optional and command-line flags take precedence. Unknown fields in the
/// YAML are ignored for forward compatibility. Relative paths are resolved
/// against the directory holding the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template to render.
    pub template: Option<PathBuf>,

    /// Context files, applied in order (later files win).
    pub context: Vec<PathBuf>,

    /// Where the rendered document is written.
    pub out: Option<PathBuf>,

    /// Schema the rendered document must satisfy.
    pub schema: Option<PathBuf>,

    /// Use environment variables with this prefix as context.
    pub env_prefix: Option<String>,

    /// Permission bits for the rendered file.
    pub file_mode: Option<FileMode>,

    /// Inline context values with the lowest precedence.
    pub vars: BTreeMap<String, serde_yaml::Value>,
}
