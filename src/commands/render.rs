//! Implementation of the `omnirender render` command.
//!
//! Merges flags with the project config, builds the context, renders and
//! writes the output. Nothing is written unless every stage succeeds.

use super::flag_or_config;
use crate::cli::RenderArgs;
use crate::config::types::MAX_FILE_MODE;
use crate::config::{Config, FileMode};
use crate::context::{Context, ContextSources, parse_assignment};
use crate::error::{RenderError, Result};
use crate::render::{Output, Renderer};
use crate::schema::Schema;
use crate::template::Template;
use std::path::{Path, PathBuf};

/// Execute the `omnirender render` command against the process environment.
pub fn cmd_render(args: RenderArgs, config: Config) -> Result<()> {
    run_render(args, config, process_env())
}

/// Render with an explicit environment for `--env-prefix` lookups.
pub(crate) fn run_render<I>(args: RenderArgs, config: Config, env: I) -> Result<()>
where
    I: IntoIterator<Item = (String, String)>,
{
    let template_path = flag_or_config(
        args.template.clone(),
        config.template.clone(),
        "--template",
        "template",
    )?;
    let out = flag_or_config(args.out.clone(), config.out.clone(), "--out", "out")?;
    let schema_path = args.schema.clone().or_else(|| config.schema.clone());
    let mode = resolve_mode(args.mode.as_deref(), config.file_mode)?;

    let context = build_context(&args, &config, env)?;
    let template = Template::load(&template_path)?;

    let mut renderer = Renderer::new(&context);
    if let Some(path) = &schema_path {
        renderer = renderer.with_schema(&Schema::load(path)?)?;
    }

    let output = output_for(out, mode);
    let document = renderer.render_to(&template, &output)?;

    if let Output::File { path, .. } = &output {
        println!(
            "Rendered {} -> {} ({} placeholder(s))",
            template_path.display(),
            path.display(),
            document.substitutions().len()
        );
    }

    Ok(())
}

/// Merge config vars, context files, prefixed env vars and `--set` overrides.
///
/// Context files from the command line replace those from the config.
fn build_context<I>(args: &RenderArgs, config: &Config, env: I) -> Result<Context>
where
    I: IntoIterator<Item = (String, String)>,
{
    let files = if args.context.is_empty() {
        config.context.clone()
    } else {
        args.context.clone()
    };

    let env_prefix = args.env_prefix.clone().or_else(|| config.env_prefix.clone());
    if let Some(prefix) = &env_prefix
        && prefix.is_empty()
    {
        return Err(RenderError::UserError(
            "--env-prefix must not be empty".to_string(),
        ));
    }

    let overrides = args
        .set
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;

    let sources = ContextSources {
        vars: config.context_vars()?,
        files,
        env_prefix,
        overrides,
    };
    sources.build(env)
}

/// `--mode` wins over `file_mode` from the config.
fn resolve_mode(flag: Option<&str>, config: Option<FileMode>) -> Result<Option<FileMode>> {
    let Some(raw) = flag else {
        return Ok(config);
    };

    match FileMode::parse(raw) {
        Some(mode) if mode.bits() <= MAX_FILE_MODE => Ok(Some(mode)),
        _ => Err(RenderError::UserError(format!(
            "invalid --mode '{}': expected octal permission bits such as 0600",
            raw
        ))),
    }
}

fn output_for(out: PathBuf, mode: Option<FileMode>) -> Output {
    if out == Path::new("-") {
        if mode.is_some() {
            tracing::warn!("ignoring file mode when writing to stdout");
        }
        Output::Stdout
    } else {
        Output::File {
            path: out,
            mode: mode.map(FileMode::bits),
        }
    }
}

/// Environment variables with valid UTF-8 names and values.
fn process_env() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}
