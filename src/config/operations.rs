//! Config loading, validation, and path resolution.

use super::model::Config;
use super::types::{DEFAULT_CONFIG_FILE, MAX_FILE_MODE};
use crate::context::Context;
use crate::error::{RenderError, Result};
use std::path::{Path, PathBuf};

impl Config {
    /// Load config from a YAML file.
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Look for `omnirender.yaml` in `dir`. Returns `None` when absent.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Option<Self>> {
        let candidate = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `env_prefix` must be non-empty when set
    /// - `file_mode` must be at most `0777`
    /// - `vars` must hold only strings, integers, booleans or nested mappings of them
    pub fn validate(&self) -> Result<()> {
        if let Some(prefix) = &self.env_prefix
            && prefix.is_empty()
        {
            return Err(RenderError::UserError(
                "config validation failed: env_prefix must not be empty".to_string(),
            ));
        }

        if let Some(mode) = self.file_mode
            && mode.bits() > MAX_FILE_MODE
        {
            return Err(RenderError::UserError(format!(
                "config validation failed: file_mode {} exceeds {:04o}",
                mode, MAX_FILE_MODE
            )));
        }

        self.context_vars().map_err(|e| {
            RenderError::UserError(format!("config validation failed: vars: {}", e))
        })?;

        Ok(())
    }

    /// The inline `vars` as a context.
    pub fn context_vars(&self) -> Result<Context> {
        let mapping: serde_yaml::Mapping = self
            .vars
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
            .collect();
        Context::from_yaml_value(serde_yaml::Value::Mapping(mapping))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &PathBuf| -> PathBuf {
            if p.is_absolute() || base.as_os_str().is_empty() {
                p.clone()
            } else {
                base.join(p)
            }
        };

        self.template = self.template.as_ref().map(join);
        self.out = self.out.as_ref().map(join);
        self.schema = self.schema.as_ref().map(join);
        self.context = self.context.iter().map(join).collect();
    }
}
