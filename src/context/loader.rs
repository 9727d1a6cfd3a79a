//! Building a [`Context`] from files, environment variables and overrides.

use super::{Context, Value};
use crate::error::{RenderError, Result};
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};

/// Every place a context value can come from, lowest precedence first.
#[derive(Debug, Clone, Default)]
pub struct ContextSources {
    /// Inline values from the project config.
    pub vars: Context,
    /// Context files, applied in order.
    pub files: Vec<PathBuf>,
    /// Only environment variables starting with this prefix are used.
    pub env_prefix: Option<String>,
    /// `key=value` overrides, applied last.
    pub overrides: Vec<(String, String)>,
}

impl ContextSources {
    /// Merge all sources into a single context.
    ///
    /// `env` is the environment to draw prefixed variables from; pass
    /// `std::env::vars()` at the CLI edge and a fixed list in tests.
    pub fn build<I>(self, env: I) -> Result<Context>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut context = self.vars;

        for path in &self.files {
            let layer = Context::load(path)?;
            tracing::debug!(path = %path.display(), keys = layer.len(), "loaded context file");
            context.extend(layer);
        }

        if let Some(prefix) = &self.env_prefix {
            let layer = Context::from_env(prefix, env);
            tracing::debug!(prefix = %prefix, keys = layer.len(), "loaded environment context");
            context.extend(layer);
        }

        for (key, value) in self.overrides {
            context.insert(key, value);
        }

        tracing::info!(keys = context.len(), "context ready");
        Ok(context)
    }
}

impl Context {
    /// Load a context file, choosing the format from the file name.
    ///
    /// `.env` and `*.env` files use dotenv syntax; everything else is parsed
    /// as YAML, which also accepts JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if is_dotenv(path) {
            return Self::from_dotenv(path);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::UserError(format!(
                "failed to read context file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            RenderError::UserError(format!("in context file '{}': {}", path.display(), e))
        })
    }

    /// Parse a YAML (or JSON) mapping. Nested mappings flatten to dotted keys.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: YamlValue = serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::UserError(format!("failed to parse context YAML: {}", e)))?;
        Self::from_yaml_value(value)
    }

    /// Build a context from an already-parsed YAML value.
    pub fn from_yaml_value(value: YamlValue) -> Result<Self> {
        let mut context = Context::new();
        match value {
            YamlValue::Null => {}
            YamlValue::Mapping(mapping) => flatten_into(&mut context, "", mapping)?,
            _ => {
                return Err(RenderError::UserError(
                    "context must be a mapping of names to values".to_string(),
                ));
            }
        }
        Ok(context)
    }

    /// Read a dotenv file. All values are strings.
    ///
    /// Keys are lowercased, matching [`Context::from_env`], so `SMTP_HOST`
    /// and `smtp_host` name the same value. Values are taken literally: `$VAR`
    /// and `${VAR}` are never expanded.
    pub fn from_dotenv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::UserError(format!(
                "failed to read context file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let literal = escape_expansions(&content);
        let mut context = Context::new();
        for item in dotenvy::from_read_iter(literal.as_bytes()) {
            let (key, value) = item.map_err(|e| {
                RenderError::UserError(format!(
                    "failed to parse dotenv file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            context.insert(key.to_lowercase(), value);
        }
        Ok(context)
    }

    /// Collect variables starting with `prefix`, stripping it and lowercasing the rest.
    pub fn from_env<I>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(prefix)?;
                if name.is_empty() {
                    return None;
                }
                Some((name.to_lowercase(), value))
            })
            .collect()
    }
}

/// Escape every `$` dotenv would expand, so values stay literal.
///
/// Single-quoted text is never expanded and comments are dropped, so `$`
/// in either is left alone. A `$` already preceded by `\` stays as written.
fn escape_expansions(content: &str) -> String {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        Plain,
        Weak,
        Strong,
        Comment,
    }

    let mut out = String::with_capacity(content.len());
    let mut state = State::Plain;
    let mut escaped = false;
    let mut after_space = true;

    for c in content.chars() {
        if escaped {
            escaped = false;
            after_space = false;
            out.push(c);
            continue;
        }

        match (state, c) {
            (State::Comment, '\n') => state = State::Plain,
            (State::Comment, _) => {}
            (State::Strong, '\'') => state = State::Plain,
            (State::Strong, _) => {}
            (State::Weak, '"') => state = State::Plain,
            (State::Plain, '\'') => state = State::Strong,
            (State::Plain, '"') => state = State::Weak,
            (State::Plain, '#') if after_space => state = State::Comment,
            (State::Plain | State::Weak, '\\') => escaped = true,
            (State::Plain | State::Weak, '$') => out.push('\\'),
            _ => {}
        }

        after_space = c.is_whitespace();
        out.push(c);
    }
    out
}

/// Split a `key=value` override. The value may contain further `=` signs.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(RenderError::UserError(format!(
            "invalid override '{}': expected KEY=VALUE",
            raw
        )));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(RenderError::UserError(format!(
            "invalid override '{}': key must not be empty",
            raw
        )));
    }

    Ok((key.to_string(), value.to_string()))
}

fn is_dotenv(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name == ".env" || name.ends_with(".env"))
}

fn flatten_into(context: &mut Context, prefix: &str, mapping: serde_yaml::Mapping) -> Result<()> {
    for (key, value) in mapping {
        let key = scalar_key(&key)?;
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };

        let value = match value {
            YamlValue::Mapping(nested) => {
                flatten_into(context, &name, nested)?;
                continue;
            }
            YamlValue::String(s) => Value::Str(s),
            YamlValue::Bool(b) => Value::Bool(b),
            YamlValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Str(n.to_string()),
            },
            YamlValue::Null => {
                return Err(RenderError::UserError(format!(
                    "context key '{}' is null; give it a value or remove it",
                    name
                )));
            }
            YamlValue::Sequence(_) => {
                return Err(RenderError::UserError(format!(
                    "context key '{}' holds a list; only strings, integers and booleans are supported",
                    name
                )));
            }
            YamlValue::Tagged(_) => {
                return Err(RenderError::UserError(format!(
                    "context key '{}' uses a YAML tag, which is not supported",
                    name
                )));
            }
        };

        if context.insert(name.clone(), value).is_some() {
            return Err(RenderError::UserError(format!(
                "duplicate context key '{}'",
                name
            )));
        }
    }
    Ok(())
}

fn scalar_key(key: &YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        other => Err(RenderError::UserError(format!(
            "context keys must be scalars, found {:?}",
            other
        ))),
    }
}
