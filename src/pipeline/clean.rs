// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Removal of build output.
//!
//! ```text
//! clean.dirs            build/, dist/
//! clean.remove_spec     <spec_dir>/<name>.spec
//! intermediates         bot.c, bot.cpython-312-x86_64-linux-gnu.so, ...
//! pycache               __pycache__/ and stray *.pyc
//! ```

use std::path::Path;

use tracing::{debug, info};

use super::artifacts;
use crate::config::Config;
use crate::error::Result;
use crate::utility::fs::moves::remove_path;
use crate::utility::fs::walk::{WalkOptions, find_dirs_named, parallel_walk};

/// What to remove besides the configured directories and spec file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanScope {
    /// Generated C files and compiled extensions of the compile list.
    pub intermediates: bool,
    /// `__pycache__` directories and stray `.pyc` files.
    pub pycache: bool,
}

impl CleanScope {
    /// The scope `[clean]` asks for.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            intermediates: config.clean.intermediates,
            pycache: config.clean.pycache,
        }
    }
}

fn remove(path: &Path, what: &str, dry_run: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if dry_run {
        info!(path = %path.display(), "[dry-run] would delete {}", what);
        return Ok(true);
    }
    let removed = remove_path(path)?;
    if removed {
        debug!(path = %path.display(), "deleted {}", what);
    }
    Ok(removed)
}

/// Removes build output and returns how many paths were (or would be)
/// deleted.
///
/// # Errors
///
/// Returns an error if a path cannot be removed or the project tree cannot
/// be walked.
pub fn clean_project(config: &Config, scope: CleanScope, dry_run: bool) -> Result<usize> {
    let mut count = 0;

    for dir in &config.clean.dirs {
        count += usize::from(remove(dir, "directory", dry_run)?);
    }
    if config.clean.remove_spec {
        count += usize::from(remove(&config.spec_file(), "spec file", dry_run)?);
    }

    let root = config.project_root();
    if scope.intermediates {
        count += artifacts::remove_intermediates(root, config.compile_modules(), dry_run)?;
    }

    if scope.pycache {
        let options = WalkOptions::for_python_project();
        for dir in find_dirs_named(root, "__pycache__", &options)? {
            count += usize::from(remove(&dir, "bytecode cache", dry_run)?);
        }
        let walk = parallel_walk(root, &options)?;
        for file in walk.files() {
            let in_cache = file.components().any(|c| c.as_os_str() == "__pycache__");
            if !in_cache && file.extension().is_some_and(|ext| ext == "pyc") {
                count += usize::from(remove(file, "bytecode file", dry_run)?);
            }
        }
    }

    info!(count, "cleaned");
    Ok(count)
}
