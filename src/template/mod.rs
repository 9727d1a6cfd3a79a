//! Template loading and placeholder scanning.
//!
//! # Syntax
//!
//! - `{{ name }}` - Substitutes the context value for `name`
//! - `{{ name | upper | trim }}` - Applies filters left to right
//! - `{{ name | default('x') }}` - Uses `x` when `name` is not in the context
//!
//! Single braces are ordinary text, so Ruby hashes and nginx blocks pass
//! through untouched. A `}}` outside a placeholder is a syntax error.

mod filters;
mod parser;

pub use filters::{
    Filter, MOSQUITTO_ITERATIONS, MOSQUITTO_SALT_LEN, apply_all, mosquitto_passwd,
    mosquitto_passwd_with_salt,
};
pub use parser::{Placeholders, Token};

use crate::error::{RenderError, Result};
use std::path::{Path, PathBuf};

/// An immutable template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    origin: Option<PathBuf>,
}

impl Template {
    /// Wrap in-memory template text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            origin: None,
        }
    }

    /// Read a template from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            RenderError::UserError(format!(
                "failed to read template '{}': {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.display(), bytes = source.len(), "loaded template");
        Ok(Self {
            source,
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Path the template was loaded from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Lazily scan the template for placeholders.
    pub fn placeholders(&self) -> Placeholders<'_> {
        Placeholders::new(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_fixture;
    use tempfile::TempDir;

    #[test]
    fn test_load_remembers_origin() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(dir.path(), "gitlab.rb.tmpl", "port = {{ p }}\n");

        let template = Template::load(&path).unwrap();
        assert_eq!(template.source(), "port = {{ p }}\n");
        assert_eq!(template.origin(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_file_is_user_error() {
        let dir = TempDir::new().unwrap();
        let err = Template::load(dir.path().join("nope.tmpl")).unwrap_err();
        assert!(matches!(err, RenderError::UserError(_)));
        assert!(err.to_string().contains("failed to read template"));
    }

    #[test]
    fn test_placeholders_over_omnibus_template() {
        let template = Template::new(crate::test_support::OMNIBUS_TEMPLATE);
        let names: Vec<String> = template
            .placeholders()
            .map(|t| t.map(|t| t.name.to_string()))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            names,
            vec![
                "domain",
                "domain",
                "domain",
                "smtp_host",
                "smtp_port",
                "smtp_user",
                "smtp_password",
            ]
        );
    }
}
