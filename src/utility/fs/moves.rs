// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{FsError, FreezeResult};

fn io_error(path: &Path, source: std::io::Error) -> FsError {
    FsError::IoError {
        path: path.display().to_string(),
        source,
    }
}

/// Moves a file, creating the destination's parent directories.
///
/// Uses `rename` and falls back to copy + remove when source and destination
/// live on different filesystems. The destination must not exist.
///
/// # Errors
///
/// Returns `FsError::NotFound` if `from` does not exist, or `FsError::IoError`
/// if the destination exists or any filesystem operation fails.
pub fn move_file(from: &Path, to: &Path) -> FreezeResult<()> {
    if !from.is_file() {
        return Err(FsError::NotFound(from.display().to_string()).into());
    }
    if to.exists() {
        return Err(io_error(to, std::io::Error::from(ErrorKind::AlreadyExists)).into());
    }
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            std::fs::copy(from, to).map_err(|e| io_error(to, e))?;
            std::fs::remove_file(from).map_err(|e| io_error(from, e))?;
            Ok(())
        }
        Err(e) => Err(io_error(from, e).into()),
    }
}

/// Removes a file or a directory tree.
///
/// Returns `Ok(false)` when nothing existed at `path`.
///
/// # Errors
///
/// Returns `FsError::IoError` if the removal fails.
pub fn remove_path(path: &Path) -> FreezeResult<bool> {
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return Ok(false);
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(path, e).into()),
    }
}
