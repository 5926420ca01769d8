// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source hiding.
//!
//! Compiled modules only win over their sources while the `.py` files are
//! out of the way. The stash parks them and always brings them back.
//!
//! ```text
//! hide()     for each module:
//!              manifest.json += entry    (atomic write, before the move)
//!              root/pkg/bot.py --> stash/pkg/bot.py
//! restore()  stash/pkg/bot.py --> root/pkg/bot.py   (never overwrites)
//!            remove stash dir once empty
//! Drop       restore() if it never ran
//! recover()  manifest.json left by a crashed run --> restore()
//! ```

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::error::{FreezeError, FreezeResult, StashError};
use crate::utility::fs::moves::{move_file, remove_path};

/// Name of the manifest inside the stash directory.
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// One hidden source. Both paths are relative: `original` to the project
/// root, `stashed` to the stash directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    pub original: PathBuf,
    pub stashed: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    root: PathBuf,
    entries: Vec<StashEntry>,
}

fn manifest_error(path: &Path, message: impl Into<String>) -> StashError {
    StashError::Manifest {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Sources moved out of a project for the duration of a freeze.
#[derive(Debug)]
pub struct SourceStash {
    root: PathBuf,
    dir: PathBuf,
    entries: Vec<StashEntry>,
    dry_run: bool,
    restored: bool,
}

impl SourceStash {
    /// Moves `modules` (relative to `root`) into `dir`.
    ///
    /// Nothing is moved unless every module exists and no stash is present.
    /// A failure part-way moves the already hidden files back.
    ///
    /// # Errors
    ///
    /// Returns `StashError::AlreadyExists` if `dir` exists,
    /// `StashError::OutsideRoot` for a module path that is not a plain
    /// relative path, `StashError::MissingSource` for a module that is not a
    /// file, or the move / manifest error that stopped the hide.
    pub fn hide(root: &Path, dir: &Path, modules: &[PathBuf], dry_run: bool) -> FreezeResult<Self> {
        // Dry runs only log stale stash recovery.
        if dir.exists() && !dry_run {
            return Err(StashError::AlreadyExists(dir.to_path_buf()).into());
        }
        for module in modules {
            if !is_contained(module) {
                return Err(StashError::OutsideRoot(module.clone()).into());
            }
            if !root.join(module).is_file() {
                return Err(StashError::MissingSource(root.join(module)).into());
            }
        }

        let mut stash = Self {
            root: root.to_path_buf(),
            dir: dir.to_path_buf(),
            entries: Vec::with_capacity(modules.len()),
            dry_run,
            restored: false,
        };

        if dry_run {
            for module in modules {
                info!(source = %module.display(), "[dry-run] would hide");
            }
            stash.entries = modules
                .iter()
                .map(|m| StashEntry {
                    original: m.clone(),
                    stashed: m.clone(),
                })
                .collect();
            return Ok(stash);
        }

        for module in modules {
            if let Err(e) = stash.hide_one(module) {
                error!(source = %module.display(), error = %e, "hiding failed, rolling back");
                if let Err(rollback) = stash.restore_entries() {
                    error!(error = %rollback, "rollback incomplete");
                }
                return Err(e);
            }
        }

        info!(count = stash.entries.len(), dir = %stash.dir.display(), "sources hidden");
        Ok(stash)
    }

    fn hide_one(&mut self, module: &Path) -> FreezeResult<()> {
        self.entries.push(StashEntry {
            original: module.to_path_buf(),
            stashed: module.to_path_buf(),
        });
        self.write_manifest()?;

        if let Err(e) = move_file(&self.root.join(module), &self.dir.join(module)) {
            self.entries.pop();
            if let Err(manifest) = self.write_manifest() {
                error!(error = %manifest, "manifest update failed");
            }
            return Err(e);
        }
        debug!(source = %module.display(), "hidden");
        Ok(())
    }

    /// Restores sources left behind by a run that never got to restore them.
    ///
    /// Returns `None` when `dir` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StashError::Manifest` if `dir` exists without a readable
    /// manifest, or the first restore error.
    pub fn recover(root: &Path, dir: &Path, dry_run: bool) -> FreezeResult<Option<usize>> {
        if !dir.exists() {
            return Ok(None);
        }

        let path = dir.join(MANIFEST_FILE);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| manifest_error(&path, format!("cannot read: {e}")))?;
        let manifest: Manifest =
            serde_json::from_str(&text).map_err(|e| manifest_error(&path, e.to_string()))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(manifest_error(
                &path,
                format!("unsupported version {}", manifest.version),
            )
            .into());
        }
        if manifest.root != root {
            warn!(
                recorded = %manifest.root.display(),
                root = %root.display(),
                "stash was created for another project root, restoring into the current one"
            );
        }
        if let Some(bad) = manifest
            .entries
            .iter()
            .find(|e| !is_contained(&e.original) || !is_contained(&e.stashed))
        {
            return Err(StashError::OutsideRoot(bad.original.clone()).into());
        }

        warn!(count = manifest.entries.len(), dir = %dir.display(), "recovering sources from an interrupted run");
        let stash = Self {
            root: root.to_path_buf(),
            dir: dir.to_path_buf(),
            entries: manifest.entries,
            dry_run,
            restored: false,
        };
        stash.restore().map(Some)
    }

    #[must_use]
    pub fn entries(&self) -> &[StashEntry] {
        &self.entries
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Moves every hidden source back and removes the stash directory.
    ///
    /// A source that reappeared at its original location is never
    /// overwritten: its stashed copy stays, listed in the manifest.
    ///
    /// # Errors
    ///
    /// Returns `StashError::Conflict` for the first source that could not be
    /// put back because its location is taken, or the first move error.
    pub fn restore(mut self) -> FreezeResult<usize> {
        self.restore_entries()
    }

    fn restore_entries(&mut self) -> FreezeResult<usize> {
        self.restored = true;

        if self.dry_run {
            for entry in &self.entries {
                info!(source = %entry.original.display(), "[dry-run] would restore");
            }
            return Ok(self.entries.len());
        }

        let mut restored = 0;
        let mut remaining = Vec::new();
        let mut first_error: Option<FreezeError> = None;

        for entry in std::mem::take(&mut self.entries) {
            let original = self.root.join(&entry.original);
            let stashed = self.dir.join(&entry.stashed);

            if !stashed.is_file() {
                if original.is_file() {
                    debug!(source = %entry.original.display(), "already in place");
                } else {
                    error!(source = %entry.original.display(), "stashed copy is gone");
                    first_error.get_or_insert(StashError::MissingSource(stashed).into());
                }
                continue;
            }

            if original.exists() {
                warn!(
                    source = %original.display(),
                    stashed = %stashed.display(),
                    "source reappeared, keeping the stashed copy"
                );
                first_error.get_or_insert(
                    StashError::Conflict {
                        original,
                        stashed,
                    }
                    .into(),
                );
                remaining.push(entry);
                continue;
            }

            match move_file(&stashed, &original) {
                Ok(()) => {
                    debug!(source = %entry.original.display(), "restored");
                    restored += 1;
                }
                Err(e) => {
                    error!(source = %entry.original.display(), error = %e, "restore failed");
                    first_error.get_or_insert(e);
                    remaining.push(entry);
                }
            }
        }

        self.entries = remaining;
        if self.entries.is_empty() {
            remove_path(&self.dir)?;
        } else {
            self.write_manifest()?;
        }

        if restored > 0 {
            info!(count = restored, "sources restored");
        }
        first_error.map_or(Ok(restored), Err)
    }

    fn write_manifest(&self) -> FreezeResult<()> {
        let path = self.dir.join(MANIFEST_FILE);
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| manifest_error(&path, format!("cannot create stash directory: {e}")))?;

        let manifest = Manifest {
            version: MANIFEST_VERSION,
            root: self.root.clone(),
            entries: self.entries.clone(),
        };
        let json = serde_json::to_vec_pretty(&manifest).map_err(|e| manifest_error(&path, e.to_string()))?;

        let mut file = NamedTempFile::new_in(&self.dir).map_err(|e| manifest_error(&path, e.to_string()))?;
        file.write_all(&json)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| manifest_error(&path, e.to_string()))?;
        file.persist(&path)
            .map_err(|e| manifest_error(&path, e.error.to_string()))?;
        Ok(())
    }
}

impl Drop for SourceStash {
    fn drop(&mut self) {
        if self.restored || self.entries.is_empty() {
            return;
        }
        warn!(dir = %self.dir.display(), "stash dropped without restore, restoring now");
        if let Err(e) = self.restore_entries() {
            error!(error = %e, "restore on drop failed, run `cyfreeze restore`");
        }
    }
}

#[cfg(test)]
mod tests;
