//! Implementation of the `omnirender vars` command.
//!
//! Lists every placeholder in a template with its location and filters, so
//! a context file can be written against it.

use super::flag_or_config;
use crate::cli::VarsArgs;
use crate::config::Config;
use crate::error::{RenderError, Result};
use crate::template::Template;
use serde::Serialize;

/// One placeholder occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct VarInfo {
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub filters: Vec<String>,
}

/// Execute the `omnirender vars` command.
pub fn cmd_vars(args: VarsArgs, config: Config) -> Result<()> {
    let path = flag_or_config(args.template, config.template, "--template", "template")?;
    let template = Template::load(&path)?;
    let vars = collect_vars(&template)?;

    if args.json {
        let json = serde_json::to_string_pretty(&vars)
            .map_err(|e| RenderError::UserError(format!("failed to serialize output: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    if vars.is_empty() {
        println!("No placeholders in {}.", path.display());
        return Ok(());
    }

    let width = vars.iter().map(|v| v.name.len()).max().unwrap_or(0);
    for var in &vars {
        let location = format!("{}:{}", var.line, var.column);
        if var.filters.is_empty() {
            println!("  {:<width$}  {}", var.name, location);
        } else {
            println!(
                "  {:<width$}  {:<8}  | {}",
                var.name,
                location,
                var.filters.join(" | ")
            );
        }
    }

    let mut names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    println!();
    println!("{} placeholder(s), {} distinct key(s)", vars.len(), names.len());

    Ok(())
}

/// Every placeholder in source order. Fails on the first malformed token.
pub(crate) fn collect_vars(template: &Template) -> Result<Vec<VarInfo>> {
    template
        .placeholders()
        .map(|token| {
            let token = token?;
            Ok(VarInfo {
                name: token.name.to_string(),
                line: token.line,
                column: token.column,
                filters: token.filters.iter().map(ToString::to_string).collect(),
            })
        })
        .collect()
}
