// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! pip installer.
//!
//! ```text
//! PipTool::packages([...])      python -m pip install --disable-pip-version-check pkg...
//! PipTool::requirements(file)   python -m pip install --disable-pip-version-check -r file
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use anyhow::Context;
use tracing::info;

use super::python::PythonInterpreter;
use super::{BoxFuture, Tool, ToolContext};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Install {
    Packages(Vec<String>),
    Requirements(PathBuf),
}

/// Installs packages into the interpreter's environment.
#[derive(Debug, Clone)]
pub struct PipTool {
    python: PythonInterpreter,
    install: Install,
}

impl PipTool {
    #[must_use]
    pub fn packages(python: PythonInterpreter, packages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            python,
            install: Install::Packages(packages.into_iter().map(Into::into).collect()),
        }
    }

    #[must_use]
    pub fn requirements(python: PythonInterpreter, file: impl AsRef<Path>) -> Self {
        Self {
            python,
            install: Install::Requirements(file.as_ref().to_path_buf()),
        }
    }

    /// Interpreter arguments for this installation.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-m", "pip", "install", "--disable-pip-version-check"]
            .into_iter()
            .map(String::from)
            .collect();
        match &self.install {
            Install::Packages(packages) => args.extend(packages.iter().cloned()),
            Install::Requirements(file) => {
                args.push("-r".to_string());
                args.push(file.display().to_string());
            }
        }
        args
    }
}

impl Tool for PipTool {
    fn name(&self) -> &'static str {
        "pip"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match &self.install {
                Install::Packages(packages) if packages.is_empty() => return Ok(()),
                Install::Packages(packages) => info!(packages = %packages.join(" "), "installing"),
                Install::Requirements(file) => info!(file = %file.display(), "installing requirements"),
            }

            let builder = ctx.prepare(self.python.command("pip").args(self.args()));
            ctx.execute(builder).await.context("pip install failed")?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests;
