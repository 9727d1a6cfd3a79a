//! Substitution context: the key/value source for placeholders.
//!
//! A [`Context`] is built once from explicit sources (see [`ContextSources`])
//! and then only read. Nothing in this module touches the process
//! environment; callers hand environment variables in.

mod loader;


pub use loader::{ContextSources, parse_assignment};

use crate::error::{RenderError, Result};
use crate::template::{Token, apply_all};
use std::collections::BTreeMap;
use std::fmt;

/// A substitution value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Mapping from placeholder name to substitution value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one for that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Layer `other` on top of `self`; keys in `other` win.
    pub fn extend(&mut self, other: Context) {
        self.values.extend(other.values);
    }

    /// Resolve a placeholder to its substitution text, filters applied.
    ///
    /// When the key is absent the token's `default(...)` value is used and
    /// only the filters written after `default` run on it. Without a default
    /// a missing key is a [`RenderError::MissingKey`].
    pub fn resolve(&self, token: &Token<'_>) -> Result<String> {
        if let Some(value) = self.get(token.name) {
            return Ok(token.apply_filters(value.to_string()));
        }
        if let Some((fallback, rest)) = token.fallback() {
            tracing::debug!(name = token.name, "using default for missing key");
            return Ok(apply_all(rest, fallback.to_string()));
        }
        Err(RenderError::MissingKey {
            name: token.name.to_string(),
            line: token.line,
            column: token.column,
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
