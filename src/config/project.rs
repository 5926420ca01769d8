// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path resolution and validation of the project layout.
//!
//! ```text
//! project.root  --absolute-->  /abs/root
//! entry, dist_dir, work_dir, spec_dir, stash.dir,
//! clean.dirs, requirements, setup_script, icon,
//! data[].source                --join root-->  /abs/root/...
//! project.compile               stays relative, normalised and checked
//! ```

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::Config;
use crate::error::{ConfigError, Result};

fn invalid(section: &str, key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message,
    }
}

/// Joins `path` onto `root` unless it is absolute, dropping `.` components.
fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let mut out = root.to_path_buf();
    for component in path.components() {
        if component != Component::CurDir {
            out.push(component);
        }
    }
    out
}

/// Checks a compile entry and returns it without `.` components.
fn normalize_module(path: &Path) -> std::result::Result<PathBuf, ConfigError> {
    let shown = path.display();
    if path.has_root() || path.is_absolute() {
        return Err(invalid(
            "project",
            "compile",
            format!("'{shown}' must be relative to the project root"),
        ));
    }

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => out.push(part),
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid(
                    "project",
                    "compile",
                    format!("'{shown}' escapes the project root"),
                ));
            }
        }
    }

    if out.extension().and_then(|e| e.to_str()) != Some("py") {
        return Err(invalid(
            "project",
            "compile",
            format!("'{shown}' is not a .py source file"),
        ));
    }
    Ok(out)
}

impl Config {
    /// Resolves project-relative paths and validates the project layout.
    ///
    /// Idempotent: resolving an already resolved config changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty entry or name, and
    /// for compile entries that are absolute, escape the root, are not `.py`
    /// files, are listed twice, or name the entry script.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        if self.project.entry.as_os_str().is_empty() {
            return Err(invalid("project", "entry", "must not be empty".to_string()).into());
        }
        if let Some(name) = &self.project.name
            && (name.trim().is_empty() || name.contains(['/', '\\']))
        {
            return Err(invalid(
                "project",
                "name",
                format!("'{name}' is not a valid executable name"),
            )
            .into());
        }

        let root = std::path::absolute(&self.project.root).map_err(|e| {
            invalid(
                "project",
                "root",
                format!("cannot resolve '{}': {e}", self.project.root.display()),
            )
        })?;
        self.project.root.clone_from(&root);

        self.project.entry = resolve(&root, &self.project.entry);

        let mut seen = BTreeSet::new();
        let mut modules = Vec::with_capacity(self.project.compile.len());
        for module in &self.project.compile {
            // Already-resolved entries are accepted back as relative paths.
            let relative = module.strip_prefix(&root).unwrap_or(module);
            let module = normalize_module(relative)?;
            if !seen.insert(module.clone()) {
                return Err(invalid(
                    "project",
                    "compile",
                    format!("'{}' is listed twice", module.display()),
                )
                .into());
            }
            if root.join(&module) == self.project.entry {
                return Err(invalid(
                    "project",
                    "compile",
                    format!(
                        "'{}' is the entry script, which must stay a source file",
                        module.display()
                    ),
                )
                .into());
            }
            modules.push(module);
        }
        self.project.compile = modules;

        if let Some(python) = &self.tools.python
            && python.components().count() > 1
        {
            self.tools.python = Some(resolve(&root, python));
        }

        if let Some(requirements) = &self.deps.requirements {
            self.deps.requirements = Some(resolve(&root, requirements));
        }
        self.cython.setup_script = resolve(&root, &self.cython.setup_script);

        if let Some(icon) = &self.freeze.icon {
            self.freeze.icon = Some(resolve(&root, icon));
        }
        for mapping in &mut self.freeze.data {
            mapping.source = resolve(&root, &mapping.source);
        }
        self.freeze.dist_dir = resolve(&root, &self.freeze.dist_dir);
        self.freeze.work_dir = resolve(&root, &self.freeze.work_dir);
        self.freeze.spec_dir = resolve(&root, &self.freeze.spec_dir);

        self.stash.dir = resolve(&root, &self.stash.dir);
        for dir in &mut self.clean.dirs {
            *dir = resolve(&root, dir);
        }

        Ok(())
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project.root
    }

    #[must_use]
    pub fn entry_script(&self) -> &Path {
        &self.project.entry
    }

    /// Compile entries relative to the project root.
    #[must_use]
    pub fn compile_modules(&self) -> &[PathBuf] {
        &self.project.compile
    }

    /// Name of the frozen executable: `project.name` or the entry's stem.
    #[must_use]
    pub fn app_name(&self) -> String {
        self.project.name.clone().unwrap_or_else(|| {
            self.project
                .entry
                .file_stem()
                .map_or_else(|| "app".to_string(), |s| s.to_string_lossy().into_owned())
        })
    }

    /// The `.spec` file PyInstaller writes for this project.
    #[must_use]
    pub fn spec_file(&self) -> PathBuf {
        self.freeze.spec_dir.join(format!("{}.spec", self.app_name()))
    }

    #[must_use]
    pub fn stash_dir(&self) -> &Path {
        &self.stash.dir
    }

    /// Per-invocation tool timeout, `None` when `tools.timeout_secs` is 0.
    #[must_use]
    pub const fn tool_timeout(&self) -> Option<Duration> {
        match self.tools.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
