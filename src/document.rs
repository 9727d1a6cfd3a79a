//! The output of rendering: final text plus a record of what was substituted.

/// One placeholder replacement performed while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Placeholder name.
    pub name: String,
    /// Byte offset of the placeholder in the template.
    pub offset: usize,
    /// Text inserted into the output, after filters.
    pub value: String,
}

/// A `key = value` line found in rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
    /// 1-based line number.
    pub line: usize,
}

/// Rendered text with no placeholder syntax left in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    text: String,
    substitutions: Vec<Substitution>,
}

impl RenderedDocument {
    pub(crate) fn new(text: String, substitutions: Vec<Substitution>) -> Self {
        Self {
            text,
            substitutions,
        }
    }

    /// Wrap text that was rendered elsewhere. It has no substitution record,
    /// so schema checks fall back to its assignment lines.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text.into(), Vec::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Values inserted for placeholder `name`, in template order.
    pub fn substituted_values(&self, name: &str) -> Vec<&str> {
        self.substitutions
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.value.as_str())
            .collect()
    }

    /// Scan the text for `key = value` lines.
    ///
    /// Comment lines (`#`) and operators such as `=>`, `==`, `!=` are skipped.
    /// Matching single or double quotes around the value are removed.
    pub fn assignments(&self) -> Vec<Assignment> {
        self.text
            .lines()
            .enumerate()
            .filter_map(|(i, line)| parse_assignment_line(line).map(|(key, value)| Assignment {
                key,
                value,
                line: i + 1,
            }))
            .collect()
    }
}

fn parse_assignment_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (lhs, rhs) = line.split_once('=')?;
    if rhs.starts_with(['=', '>']) || lhs.ends_with(['!', '<', '>']) {
        return None;
    }

    let key = lhs.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), strip_quotes(rhs.trim()).to_string()))
}

fn strip_quotes(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q))
        {
            return inner;
        }
    }
    value
}
