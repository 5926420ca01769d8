// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Compiled artifacts next to module sources.
//!
//! ```text
//! pkg/bot.py  -->  pkg/bot.c | pkg/bot.cpp                    generated C
//!                  pkg/bot.so | pkg/bot.pyd                    extension
//!                  pkg/bot.cpython-312-x86_64-linux-gnu.so     tagged extension
//!                  pkg/bot.cp312-win_amd64.pyd
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};
use wax::{Glob, Program};

use crate::error::{Result, ToolchainError};
use crate::utility::fs::moves::remove_path;

/// Matches what follows `<stem>.` in an extension module's file name.
const EXTENSION_SUFFIX: &str = "{so,pyd,*.so,*.pyd}";

/// Generated C sources Cython leaves behind.
const GENERATED_SOURCES: [&str; 2] = ["c", "cpp"];

/// Compiled extensions for `module` (relative to `root`), sorted.
///
/// # Errors
///
/// Returns an error if the module's directory cannot be read.
pub fn extensions(root: &Path, module: &Path) -> Result<Vec<PathBuf>> {
    let source = root.join(module);
    let (Some(dir), Some(stem)) = (source.parent(), source.file_stem().and_then(|s| s.to_str()))
    else {
        return Ok(Vec::new());
    };
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let glob = Glob::new(EXTENSION_SUFFIX)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{EXTENSION_SUFFIX}': {e}"))?;

    let mut found = Vec::new();
    let entries = std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if let Some(name) = name.to_str()
            && let Some(suffix) = name.strip_prefix(stem).and_then(|rest| rest.strip_prefix('.'))
            && glob.is_match(suffix)
            && entry.file_type().is_ok_and(|ft| ft.is_file())
        {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

/// The first compiled extension for `module`, if any.
///
/// # Errors
///
/// Returns an error if the module's directory cannot be read.
pub fn find_extension(root: &Path, module: &Path) -> Result<Option<PathBuf>> {
    Ok(extensions(root, module)?.into_iter().next())
}

/// Requires a compiled extension for every module.
///
/// # Errors
///
/// Returns `ToolchainError::MissingExtension` naming every module without
/// one.
pub fn require_extensions(root: &Path, modules: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::with_capacity(modules.len());
    let mut missing = Vec::new();
    for module in modules {
        match find_extension(root, module)? {
            Some(extension) => {
                debug!(module = %module.display(), extension = %extension.display(), "compiled");
                found.push(extension);
            }
            None => missing.push(module.display().to_string()),
        }
    }

    if missing.is_empty() {
        Ok(found)
    } else {
        Err(ToolchainError::MissingExtension(missing).into())
    }
}

/// Generated C sources and compiled extensions that exist for `module`.
///
/// # Errors
///
/// Returns an error if the module's directory cannot be read.
pub fn intermediates(root: &Path, module: &Path) -> Result<Vec<PathBuf>> {
    let source = root.join(module);
    let mut files: Vec<PathBuf> = GENERATED_SOURCES
        .iter()
        .map(|ext| source.with_extension(ext))
        .filter(|path| path.is_file())
        .collect();
    files.extend(extensions(root, module)?);
    Ok(files)
}

/// Removes the intermediates of every module and returns how many files were
/// (or, in a dry run, would be) removed.
///
/// # Errors
///
/// Returns an error if a directory cannot be read or a file cannot be removed.
pub fn remove_intermediates(root: &Path, modules: &[PathBuf], dry_run: bool) -> Result<usize> {
    let mut count = 0;
    for module in modules {
        for file in intermediates(root, module)? {
            if dry_run {
                info!(path = %file.display(), "[dry-run] would delete intermediate");
            } else {
                remove_path(&file)?;
                debug!(path = %file.display(), "deleted intermediate");
            }
            count += 1;
        }
    }
    Ok(count)
}
