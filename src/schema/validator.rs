//! Checking a rendered document against a schema.

use super::model::Schema;
use super::types::{SchemaReport, SchemaViolation, ViolationKind};
use crate::document::RenderedDocument;
use crate::error::{RenderError, Result};
use regex::Regex;

/// A schema with its patterns compiled, ready to validate documents.
#[derive(Debug)]
pub struct CompiledSchema {
    fields: Vec<CompiledField>,
}

#[derive(Debug)]
struct CompiledField {
    name: String,
    kind: super::Kind,
    required: bool,
    pattern: Option<Regex>,
}

impl CompiledSchema {
    /// Compile field patterns.
    ///
    /// An invalid regex is a configuration error, not a schema violation.
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let mut fields = Vec::with_capacity(schema.fields.len());

        for (name, spec) in &schema.fields {
            let pattern = match spec.pattern() {
                Some(p) => Some(Regex::new(p).map_err(|e| {
                    RenderError::UserError(format!(
                        "invalid pattern for schema field '{}': '{}' - {}",
                        name, p, e
                    ))
                })?),
                None => None,
            };

            fields.push(CompiledField {
                name: name.clone(),
                kind: spec.kind(),
                required: spec.required(),
                pattern,
            });
        }

        Ok(Self { fields })
    }
}

/// Validate a rendered document.
///
/// Values for a field come from the substitutions of the placeholder with
/// that name. When the document has none (for example a file rendered
/// elsewhere), `key = value` lines whose key equals the field name are used.
pub fn validate(schema: &CompiledSchema, document: &RenderedDocument) -> SchemaReport {
    let assignments = document.assignments();
    let mut violations = Vec::new();

    for field in &schema.fields {
        let mut values = document.substituted_values(&field.name);
        if values.is_empty() {
            values = assignments
                .iter()
                .filter(|a| a.key == field.name)
                .map(|a| a.value.as_str())
                .collect();
        }

        if values.is_empty() {
            if field.required {
                violations.push(SchemaViolation::new(
                    &field.name,
                    None,
                    ViolationKind::Missing,
                    "no value in rendered document",
                ));
            }
            continue;
        }

        let mut seen: Vec<&str> = Vec::new();
        for value in values {
            if seen.contains(&value) {
                continue;
            }
            seen.push(value);

            if let Err((kind, message)) = field.kind.check(value) {
                violations.push(SchemaViolation::new(&field.name, Some(value), kind, message));
                continue;
            }

            if let Some(pattern) = &field.pattern
                && !pattern.is_match(value)
            {
                violations.push(SchemaViolation::new(
                    &field.name,
                    Some(value),
                    ViolationKind::PatternMismatch,
                    format!("does not match pattern '{}'", pattern.as_str()),
                ));
            }
        }
    }

    tracing::debug!(
        fields = schema.fields.len(),
        violations = violations.len(),
        "schema validation finished"
    );

    if violations.is_empty() {
        SchemaReport::pass()
    } else {
        SchemaReport::fail(violations)
    }
}

/// Compile the schema and validate in one call.
pub fn validate_with_schema(schema: &Schema, document: &RenderedDocument) -> Result<SchemaReport> {
    let compiled = CompiledSchema::from_schema(schema)?;
    Ok(validate(&compiled, document))
}
