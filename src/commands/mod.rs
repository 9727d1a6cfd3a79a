//! Command implementations for omnirender.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations and the helpers they share: config discovery and merging
//! flags with config values.

mod check;
mod render;
mod vars;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::{RenderError, Result};
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
///
/// Loads the project config first (`--config`, or `omnirender.yaml` in the
/// current directory) so every command sees the same defaults.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render(args) => render::cmd_render(args, config),
        Command::Check(args) => check::cmd_check(args, config),
        Command::Vars(args) => vars::cmd_vars(args, config),
    }
}

/// Load an explicit config file, or discover one in the working directory.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    let cwd = std::env::current_dir().map_err(|e| {
        RenderError::UserError(format!("failed to determine current directory: {}", e))
    })?;

    match Config::discover(&cwd)? {
        Some(config) => Ok(config),
        None => {
            tracing::debug!("no project config found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Pick the flag value, falling back to the config value.
///
/// Fails with a message naming both the flag and the config key when
/// neither is set.
fn flag_or_config(
    flag: Option<PathBuf>,
    config: Option<PathBuf>,
    flag_name: &str,
    config_key: &str,
) -> Result<PathBuf> {
    flag.or(config).ok_or_else(|| {
        RenderError::UserError(format!(
            "no {} given.\n\n\
             Pass {} or set '{}' in omnirender.yaml.",
            config_key, flag_name, config_key
        ))
    })
}
