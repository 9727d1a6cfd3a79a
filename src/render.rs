//! Render orchestration: parse, resolve, substitute, validate, emit.
//!
//! Every stage fails fast. Output is only written after the whole document
//! has rendered and validated, so an error never leaves partial output.

use crate::context::Context;
use crate::document::{RenderedDocument, Substitution};
use crate::error::{RenderError, Result};
use crate::fs::atomic_write_file;
use crate::schema::{CompiledSchema, Schema, validate};
use crate::template::Template;
use std::io::Write;
use std::path::PathBuf;

/// Where the rendered document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    /// Atomically replaced file, with optional unix permission bits.
    File { path: PathBuf, mode: Option<u32> },
}

impl Output {
    /// Write the document.
    pub fn emit(&self, document: &RenderedDocument) -> Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(document.text().as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| RenderError::UserError(format!("failed to write to stdout: {}", e)))
            }
            Output::File { path, mode } => atomic_write_file(path, document.text(), *mode),
        }
    }
}

/// Substitute every placeholder in `template` from `context`.
///
/// The result never contains `{{` or `}}`: a template that would leave one
/// behind is rejected by the parser, and a value that would introduce one is
/// rejected here.
pub fn render(template: &Template, context: &Context) -> Result<RenderedDocument> {
    let source = template.source();
    let mut text = String::with_capacity(source.len());
    let mut substitutions = Vec::new();
    let mut last = 0;

    for token in template.placeholders() {
        let token = token?;
        text.push_str(&source[last..token.offset]);

        let value = context.resolve(&token)?;
        text.push_str(&value);

        substitutions.push(Substitution {
            name: token.name.to_string(),
            offset: token.offset,
            value,
        });
        last = token.end();
    }
    text.push_str(&source[last..]);

    if let Some(offset) = find_delimiter(&text) {
        return Err(RenderError::ResidualDelimiter { offset });
    }

    tracing::info!(
        placeholders = substitutions.len(),
        bytes = text.len(),
        "rendered template"
    );
    Ok(RenderedDocument::new(text, substitutions))
}

fn find_delimiter(text: &str) -> Option<usize> {
    match (text.find("{{"), text.find("}}")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Runs the full pipeline for one template against one context.
#[derive(Debug)]
pub struct Renderer<'a> {
    context: &'a Context,
    schema: Option<CompiledSchema>,
}

impl<'a> Renderer<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self {
            context,
            schema: None,
        }
    }

    /// Validate rendered documents against `schema` before they are emitted.
    pub fn with_schema(mut self, schema: &Schema) -> Result<Self> {
        self.schema = Some(CompiledSchema::from_schema(schema)?);
        Ok(self)
    }

    /// Render and validate without emitting.
    pub fn render(&self, template: &Template) -> Result<RenderedDocument> {
        let document = render(template, self.context)?;

        if let Some(schema) = &self.schema {
            let report = validate(schema, &document);
            if !report.passed {
                return Err(RenderError::SchemaViolation(report));
            }
        }

        Ok(document)
    }

    /// Render, validate, then emit to `output`.
    pub fn render_to(&self, template: &Template, output: &Output) -> Result<RenderedDocument> {
        let document = self.render(template)?;
        output.emit(&document)?;
        Ok(document)
    }
}
