//! Lazy placeholder scanner.
//!
//! Walks the template once, yielding a [`Token`] for every `{{ ... }}` span.
//! The scanner is fused: after the first error it yields nothing further.

use super::filters::{Filter, apply_all};
use crate::error::{RenderError, Result};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A single placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Placeholder name (trimmed).
    pub name: &'a str,
    /// Byte offset of the opening `{{`.
    pub offset: usize,
    /// Byte length of the whole token including delimiters.
    pub len: usize,
    /// 1-based line of the opening `{{`.
    pub line: usize,
    /// 1-based column (in chars) of the opening `{{`.
    pub column: usize,
    /// Filters applied left to right after resolution.
    pub filters: Vec<Filter>,
}

impl Token<'_> {
    /// Byte offset just past the closing `}}`.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The fallback supplied by a `default(...)` filter, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.fallback().map(|(value, _)| value)
    }

    /// The first `default(...)` value together with the filters written after it.
    pub fn fallback(&self) -> Option<(&str, &[Filter])> {
        self.filters.iter().enumerate().find_map(|(i, f)| match f {
            Filter::Default(value) => Some((value.as_str(), &self.filters[i + 1..])),
            _ => None,
        })
    }

    /// Run `value` through every filter, left to right.
    pub fn apply_filters(&self, value: String) -> String {
        apply_all(&self.filters, value)
    }
}

/// Iterator over the placeholders of a template.
///
/// Created by [`Template::placeholders`](super::Template::placeholders) or
/// [`Placeholders::new`].
#[derive(Debug)]
pub struct Placeholders<'a> {
    source: &'a str,
    cursor: usize,
    line: usize,
    line_start: usize,
    done: bool,
}

impl<'a> Placeholders<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            line: 1,
            line_start: 0,
            done: false,
        }
    }

    /// Advance line bookkeeping up to `offset` and return `(line, column)` there.
    fn locate(&mut self, offset: usize) -> (usize, usize) {
        let scanned = &self.source[self.cursor..offset];
        for (i, b) in scanned.bytes().enumerate() {
            if b == b'\n' {
                self.line += 1;
                self.line_start = self.cursor + i + 1;
            }
        }
        self.cursor = offset;
        let column = self.source[self.line_start..offset].chars().count() + 1;
        (self.line, column)
    }

    fn fail(&mut self, offset: usize, reason: impl Into<String>) -> Option<Result<Token<'a>>> {
        let (line, column) = self.locate(offset);
        self.done = true;
        Some(Err(RenderError::MalformedToken {
            reason: reason.into(),
            line,
            column,
        }))
    }
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let rest = &self.source[self.cursor..];
        let open = rest.find(OPEN);
        let close = rest.find(CLOSE);

        let open = match (open, close) {
            (None, None) => {
                self.done = true;
                return None;
            }
            (None, Some(c)) => {
                return self.fail(self.cursor + c, "'}}' without a matching '{{'");
            }
            (Some(o), Some(c)) if c < o => {
                return self.fail(self.cursor + c, "'}}' without a matching '{{'");
            }
            (Some(o), _) => self.cursor + o,
        };

        let body_start = open + OPEN.len();
        let body = &self.source[body_start..];
        let Some(close_rel) = body.find(CLOSE) else {
            return self.fail(open, "unterminated '{{'");
        };
        if let Some(nested) = body[..close_rel].find(OPEN) {
            return self.fail(
                body_start + nested,
                "'{{' inside an open placeholder",
            );
        }

        let inner = &self.source[body_start..body_start + close_rel];
        let end = body_start + close_rel + CLOSE.len();
        let (line, column) = self.locate(open);

        let parsed = parse_inner(inner);
        let (name, filters) = match parsed {
            Ok(parts) => parts,
            Err(reason) => {
                self.done = true;
                return Some(Err(RenderError::MalformedToken {
                    reason,
                    line,
                    column,
                }));
            }
        };

        // Keep line bookkeeping correct for tokens that span lines.
        self.locate(end);

        Some(Ok(Token {
            name,
            offset: open,
            len: end - open,
            line,
            column,
            filters,
        }))
    }
}

impl std::iter::FusedIterator for Placeholders<'_> {}

/// Split the text between the delimiters into a name and its filters.
fn parse_inner(inner: &str) -> std::result::Result<(&str, Vec<Filter>), String> {
    let mut parts = split_filters(inner).into_iter();
    let name = parts.next().unwrap_or_default().trim();

    if name.is_empty() {
        return Err("empty placeholder name".to_string());
    }
    if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(format!(
            "invalid character '{}' in placeholder name '{}'",
            bad, name
        ));
    }

    let filters = parts
        .map(|spec| Filter::parse(spec.trim()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((name, filters))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Split on `|`, ignoring pipes inside single or double quotes.
fn split_filters(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '|') => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}
