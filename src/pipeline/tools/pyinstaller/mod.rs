// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! PyInstaller freeze step.
//!
//! ```text
//! python -m PyInstaller --noconfirm [--clean] --onefile|--onedir [--noconsole]
//!   --name N --distpath D --workpath W --specpath S [--icon I]
//!   [--hidden-import M]... [--collect-all P]... [--add-data SRC<sep>DEST]...
//!   [extra args] <entry>
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use anyhow::Context;
use tracing::info;

use super::python::PythonInterpreter;
use super::{BoxFuture, Tool, ToolContext};
use crate::config::Config;
use crate::config::types::DataMapping;

/// Separator between source and destination in `--add-data`.
pub const ADD_DATA_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Suffix of the frozen executable.
const EXE_SUFFIX: &str = std::env::consts::EXE_SUFFIX;

#[derive(Debug, Clone)]
pub struct PyInstallerTool {
    python: PythonInterpreter,
    name: String,
    entry: PathBuf,
    onefile: bool,
    console: bool,
    clean_cache: bool,
    icon: Option<PathBuf>,
    hidden_imports: Vec<String>,
    collect_all: Vec<String>,
    data: Vec<DataMapping>,
    extra_args: Vec<String>,
    dist_dir: PathBuf,
    work_dir: PathBuf,
    spec_dir: PathBuf,
}

impl PyInstallerTool {
    /// Builds the freeze step. `hidden_imports` is the resolved hint list,
    /// which already contains `freeze.hidden_imports`.
    #[must_use]
    pub fn from_config(python: PythonInterpreter, config: &Config, hidden_imports: Vec<String>) -> Self {
        let freeze = &config.freeze;
        Self {
            python,
            name: config.app_name(),
            entry: config.entry_script().to_path_buf(),
            onefile: freeze.onefile,
            console: freeze.console,
            clean_cache: freeze.clean_cache,
            icon: freeze.icon.clone(),
            hidden_imports,
            collect_all: freeze.collect_all.clone(),
            data: freeze.data.clone(),
            extra_args: freeze.extra_args.clone(),
            dist_dir: freeze.dist_dir.clone(),
            work_dir: freeze.work_dir.clone(),
            spec_dir: freeze.spec_dir.clone(),
        }
    }

    #[must_use]
    pub fn hidden_imports(&self) -> &[String] {
        &self.hidden_imports
    }

    /// Where PyInstaller leaves the executable (onefile) or bundle (onedir).
    #[must_use]
    pub fn expected_output(&self) -> PathBuf {
        if self.onefile {
            self.dist_dir.join(format!("{}{EXE_SUFFIX}", self.name))
        } else {
            self.dist_dir.join(&self.name)
        }
    }

    /// Interpreter arguments, paths made relative to `root` where possible.
    #[must_use]
    pub fn args(&self, root: &Path) -> Vec<String> {
        let rel = |path: &Path| {
            let shown = path.strip_prefix(root).unwrap_or(path);
            if shown.as_os_str().is_empty() {
                ".".to_string()
            } else {
                shown.display().to_string()
            }
        };

        let mut args: Vec<String> = ["-m", "PyInstaller", "--noconfirm"].map(String::from).to_vec();
        if self.clean_cache {
            args.push("--clean".to_string());
        }
        args.push(if self.onefile { "--onefile" } else { "--onedir" }.to_string());
        if !self.console {
            args.push("--noconsole".to_string());
        }

        args.extend([
            "--name".to_string(),
            self.name.clone(),
            "--distpath".to_string(),
            rel(&self.dist_dir),
            "--workpath".to_string(),
            rel(&self.work_dir),
            "--specpath".to_string(),
            rel(&self.spec_dir),
        ]);

        if let Some(icon) = &self.icon {
            args.push("--icon".to_string());
            args.push(rel(icon));
        }
        for module in &self.hidden_imports {
            args.push("--hidden-import".to_string());
            args.push(module.clone());
        }
        for package in &self.collect_all {
            args.push("--collect-all".to_string());
            args.push(package.clone());
        }
        for mapping in &self.data {
            args.push("--add-data".to_string());
            args.push(format!("{}{ADD_DATA_SEPARATOR}{}", rel(&mapping.source), mapping.dest));
        }

        args.extend(self.extra_args.iter().cloned());
        args.push(rel(&self.entry));
        args
    }
}

impl Tool for PyInstallerTool {
    fn name(&self) -> &'static str {
        "pyinstaller"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            info!(
                name = %self.name,
                hidden_imports = self.hidden_imports.len(),
                "freezing"
            );

            let builder = ctx.prepare(
                self.python
                    .command("pyinstaller")
                    .args(self.args(ctx.config().project_root())),
            );
            ctx.execute(builder).await.context("PyInstaller failed")?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests;
