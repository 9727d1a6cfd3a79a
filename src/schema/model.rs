//! Schema file model.
//!
//! A schema is a YAML mapping from field name to either a bare kind or a
//! detailed rule:
//!
//! ```yaml
//! smtp_port: port
//! domain: hostname
//! external_url:
//!   kind: url
//!   required: false
//! smtp_user:
//!   kind: string
//!   pattern: "^[a-z0-9._-]+$"
//! ```

use super::kinds::Kind;
use crate::error::{RenderError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Expected kinds for rendered values, keyed by field name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: BTreeMap<String, FieldSpec>,
}

/// How a single field is checked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// Shorthand: `field: port`.
    Kind(Kind),
    /// Full form with optional settings.
    Rule(FieldRule),
}

/// Full form of a field specification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldRule {
    pub kind: Kind,

    /// A required field with no value is a violation.
    #[serde(default = "default_true")]
    pub required: bool,

    /// Regex the value must match, in addition to its kind.
    #[serde(default)]
    pub pattern: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FieldSpec {
    pub fn kind(&self) -> Kind {
        match self {
            FieldSpec::Kind(kind) => *kind,
            FieldSpec::Rule(rule) => rule.kind,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            FieldSpec::Kind(_) => true,
            FieldSpec::Rule(rule) => rule.required,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        match self {
            FieldSpec::Kind(_) => None,
            FieldSpec::Rule(rule) => rule.pattern.as_deref(),
        }
    }
}

impl Schema {
    /// Load a schema from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::UserError(format!(
                "failed to read schema file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            RenderError::UserError(format!("in schema file '{}': {}", path.display(), e))
        })
    }

    /// Parse a schema from a YAML string. An empty document is an empty schema.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::UserError(format!("failed to parse schema YAML: {}", e)))
    }

    /// Build a schema from `(field, kind)` pairs.
    pub fn from_kinds<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Kind)>,
        K: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, kind)| (k.into(), FieldSpec::Kind(kind)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
