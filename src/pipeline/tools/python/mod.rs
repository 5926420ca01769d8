// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Python interpreter discovery and probing.
//!
//! ```text
//! resolve():
//!   tools.python --> $VIRTUAL_ENV --> <root>/.venv, <root>/venv
//!   --> python3, python (PATH) --> py -3 (Windows)
//!
//! version():          python --version  --> PythonVersion
//! missing_modules():  python -c <find_spec check> names...
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::ToolContext;
use crate::config::Config;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{Result, ToolchainError};

/// Prints each argument that `importlib` cannot locate, one per line.
const FIND_SPEC_CHECK: &str = "\
import importlib.util, sys
for name in sys.argv[1:]:
    try:
        found = importlib.util.find_spec(name) is not None
    except (ImportError, ValueError):
        found = False
    if not found:
        print(name)
";

static VERSION_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Python\s+(\d+)\.(\d+)(?:\.(\d+))?").ok());

/// Parsed `Python X.Y[.Z]` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl std::fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{patch}", self.major, self.minor),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// Extracts the version from `python --version` output.
#[must_use]
pub fn parse_version(text: &str) -> Option<PythonVersion> {
    let caps = VERSION_RE.as_ref()?.captures(text)?;
    Some(PythonVersion {
        major: caps.get(1)?.as_str().parse().ok()?,
        minor: caps.get(2)?.as_str().parse().ok()?,
        patch: caps.get(3).and_then(|m| m.as_str().parse().ok()),
    })
}

/// Interpreter executable inside a virtual environment directory.
#[must_use]
pub fn venv_python(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join("python.exe")
    } else {
        venv.join("bin").join("python")
    }
}

/// A resolved Python interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonInterpreter {
    program: PathBuf,
    /// Arguments placed before everything else (`-3` for the `py` launcher).
    launcher_args: Vec<String>,
}

impl PythonInterpreter {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            launcher_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Finds the interpreter for `config`, honouring `$VIRTUAL_ENV`.
    ///
    /// # Errors
    ///
    /// Returns `ToolchainError::InterpreterNotFound` listing every candidate
    /// that was tried.
    pub fn resolve(config: &Config) -> std::result::Result<Self, ToolchainError> {
        let virtual_env = std::env::var_os("VIRTUAL_ENV")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_with(config, virtual_env.as_deref())
    }

    /// Resolution with an explicit active virtual environment.
    ///
    /// # Errors
    ///
    /// Returns `ToolchainError::InterpreterNotFound` listing every candidate
    /// that was tried.
    pub fn resolve_with(
        config: &Config,
        virtual_env: Option<&Path>,
    ) -> std::result::Result<Self, ToolchainError> {
        let mut tried = Vec::new();

        if let Some(python) = &config.tools.python {
            // Explicit choice: no fallback
            if python.components().count() > 1 {
                if python.is_file() {
                    return Ok(Self::new(python));
                }
            } else if let Some(found) = python.to_str().and_then(ProcessBuilder::find) {
                return Ok(Self::new(found));
            }
            return Err(ToolchainError::InterpreterNotFound {
                tried: python.display().to_string(),
            });
        }

        let venvs = virtual_env.into_iter().map(Path::to_path_buf).chain([
            config.project_root().join(".venv"),
            config.project_root().join("venv"),
        ]);
        for venv in venvs {
            let candidate = venv_python(&venv);
            if candidate.is_file() {
                debug!(python = %candidate.display(), "using virtual environment interpreter");
                return Ok(Self::new(candidate));
            }
            tried.push(candidate.display().to_string());
        }

        for name in ["python3", "python"] {
            if let Some(found) = ProcessBuilder::find(name) {
                return Ok(Self::new(found));
            }
            tried.push(name.to_string());
        }

        if cfg!(windows) {
            if let Some(found) = ProcessBuilder::find("py") {
                return Ok(Self {
                    program: found,
                    launcher_args: vec!["-3".to_string()],
                });
            }
            tried.push("py -3".to_string());
        }

        Err(ToolchainError::InterpreterNotFound {
            tried: tried.join(", "),
        })
    }

    /// A process builder for this interpreter, named `name` in logs.
    #[must_use]
    pub fn command(&self, name: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(&self.launcher_args)
            .name(name)
    }

    /// Runs `python --version`.
    ///
    /// Returns `None` on a dry run.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter fails to run or its output has no
    /// recognisable version.
    pub async fn version(&self, ctx: &ToolContext) -> Result<Option<PythonVersion>> {
        let builder = ctx.prepare(self.command("python").arg("--version").capture_output());
        let output = ctx.execute(builder).await?;
        if ctx.is_dry_run() {
            return Ok(None);
        }

        // Python 2 printed the version on stderr.
        let text = format!("{}\n{}", output.stdout(), output.stderr());
        parse_version(&text)
            .map(Some)
            .ok_or_else(|| ToolchainError::UnknownVersion(text.trim().to_string()).into())
    }

    /// Returns the names in `modules` that the interpreter cannot import.
    ///
    /// One interpreter call checks every module. A dry run reports nothing
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself fails.
    pub async fn missing_modules(&self, ctx: &ToolContext, modules: &[String]) -> Result<Vec<String>> {
        if modules.is_empty() {
            return Ok(Vec::new());
        }

        let builder = ctx.prepare(
            self.command("python")
                .arg("-c")
                .arg(FIND_SPEC_CHECK)
                .args(modules)
                .capture_stdout(),
        );
        let output = ctx.execute(builder).await?;

        Ok(output
            .stdout()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests;
