//! Atomic output writes.
//!
//! The rendered file is read by another server on restart, so it must never
//! be observed half-written. Every write follows the same steps:
//! 1. Create a temporary file in the target's directory with its final
//!    permissions (unix only): the requested mode, else the mode of the
//!    file being replaced
//! 2. Write content and sync the file to disk
//! 3. Rename it over the target
//!
//! Source and destination share a directory, so the rename stays on one
//! filesystem. On crash, a temporary file named `.{filename}.{pid}.tmp` may
//! remain next to the target.

use crate::error::{RenderError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write `content` to `path`, optionally setting unix permission bits.
///
/// Parent directories are created as needed. Without `mode`, an existing
/// target keeps its permissions. `mode` is ignored on platforms without unix
/// permissions.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8], mode: Option<u32>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            RenderError::UserError(format!(
                "failed to create output directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    let mode = mode.or_else(|| existing_mode(path));

    if let Err(e) = write_synced(&temp_path, content, mode) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        RenderError::UserError(format!(
            "failed to replace '{}': {}",
            path.display(),
            e
        ))
    })?;

    sync_parent(path);
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}

/// Convenience wrapper around [`atomic_write`] for string content.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str, mode: Option<u32>) -> Result<()> {
    atomic_write(path, content.as_bytes(), mode)
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            RenderError::UserError(format!("invalid output path '{}'", target.display()))
        })?;

    let temp_name = format!(".{}.{}.tmp", filename, std::process::id());
    Ok(match target.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    })
}

fn write_synced(path: &Path, content: &[u8], mode: Option<u32>) -> Result<()> {
    let mut file = create_temp(path, mode).map_err(|e| {
        RenderError::UserError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    if let Some(mode) = mode {
        set_mode(&file, mode)?;
    }

    file.write_all(content)
        .map_err(|e| RenderError::UserError(format!("failed to write temporary file: {}", e)))?;

    file.sync_all().map_err(|e| {
        RenderError::UserError(format!("failed to sync temporary file to disk: {}", e))
    })
}

/// Open the temporary file so it never exists with wider permissions than `mode`.
#[cfg(unix)]
fn create_temp(path: &Path, mode: Option<u32>) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if let Some(mode) = mode {
        options.mode(mode);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn create_temp(path: &Path, _mode: Option<u32>) -> std::io::Result<File> {
    File::create(path)
}

#[cfg(unix)]
fn existing_mode(target: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(target)
        .ok()
        .map(|meta| meta.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn existing_mode(_target: &Path) -> Option<u32> {
    None
}

/// Set the exact mode, which `create_temp` cannot do under a restrictive umask.
#[cfg(unix)]
fn set_mode(file: &File, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(mode))
        .map_err(|e| RenderError::UserError(format!("failed to set file mode {:o}: {}", mode, e)))
}

#[cfg(not(unix))]
fn set_mode(_file: &File, mode: u32) -> Result<()> {
    tracing::warn!("file mode {:o} is not supported on this platform", mode);
    Ok(())
}

#[cfg(unix)]
fn sync_parent(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        })
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_target: &Path) {}
