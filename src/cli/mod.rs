//! CLI argument parsing for omnirender.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Omnirender: render and validate templated omnibus configuration files.
///
/// Placeholders are written `{{ name }}` and filled from YAML, JSON or dotenv
/// context files, prefixed environment variables and `--set` overrides.
#[derive(Parser, Debug)]
#[command(name = "omnirender")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project config file (default: ./omnirender.yaml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for omnirender.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template to a file.
    ///
    /// Substitutes every placeholder, validates against the schema when one
    /// is given, then atomically writes the output. Nothing is written on
    /// failure.
    Render(RenderArgs),

    /// Validate an already-rendered file against a schema.
    ///
    /// Values are read from `key = value` lines in the file.
    Check(CheckArgs),

    /// List the placeholders a template uses.
    Vars(VarsArgs),
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Template file.
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Context file (YAML, JSON or .env). Repeat to layer files.
    #[arg(short, long, value_name = "PATH")]
    pub context: Vec<PathBuf>,

    /// Output file, or `-` for stdout.
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Schema file to validate the rendered output against.
    #[arg(short, long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Use environment variables with this prefix as context values.
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,

    /// Override a context value. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Octal permission bits for the output file (e.g. 0600).
    #[arg(long, value_name = "OCTAL")]
    pub mode: Option<String>,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Rendered file to check (default: `out` from the config).
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Schema file (default: `schema` from the config).
    #[arg(short, long, value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

/// Arguments for the `vars` command.
#[derive(Parser, Debug)]
pub struct VarsArgs {
    /// Template file (default: `template` from the config).
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
