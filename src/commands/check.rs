//! Implementation of the `omnirender check` command.
//!
//! Validates a file that was rendered earlier, or edited by hand, against a
//! schema. Values come from its `key = value` lines.

use super::flag_or_config;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::document::RenderedDocument;
use crate::error::{RenderError, Result};
use crate::schema::{Schema, validate_with_schema};

/// Execute the `omnirender check` command.
pub fn cmd_check(args: CheckArgs, config: Config) -> Result<()> {
    let file = flag_or_config(args.file, config.out, "--file", "out")?;
    let schema_path = flag_or_config(args.schema, config.schema, "--schema", "schema")?;

    let text = std::fs::read_to_string(&file).map_err(|e| {
        RenderError::UserError(format!("failed to read '{}': {}", file.display(), e))
    })?;
    if text.contains("{{") {
        tracing::warn!(file = %file.display(), "file still contains unrendered placeholders");
    }

    let schema = Schema::load(&schema_path)?;
    let document = RenderedDocument::from_text(text);
    let report = validate_with_schema(&schema, &document)?;

    if !report.passed {
        return Err(RenderError::SchemaViolation(report));
    }

    println!("{}: {} field(s) valid", file.display(), schema.fields.len());
    Ok(())
}
