// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cython compilation of module sources into extension modules.
//!
//! ```text
//! CythonTool::from_config()
//!   builder = auto      --> setup-py if setup_script exists, else cythonize
//!   setup-py            --> python <setup_script> build_ext --inplace [-j N]
//!   cythonize           --> python -m Cython.Build.Cythonize -i
//!                             -X language_level=<lvl> [-X k=v ...] [-j N] modules...
//! ```
//!
//! Extensions land next to their sources (`--inplace`), where the freeze
//! stage picks them up once the sources are hidden.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use anyhow::Context;
use tracing::info;

use super::python::PythonInterpreter;
use super::{BoxFuture, Tool, ToolContext};
use crate::config::Config;
use crate::config::types::CythonBuilder;
use crate::utility::encoding::Encoding;

/// Compiler diagnostics on Windows arrive in the OEM code page.
const COMPILER_OUTPUT: Encoding = if cfg!(windows) {
    Encoding::Oem
} else {
    Encoding::Utf8
};

/// Cython compile step for a set of modules.
#[derive(Debug, Clone)]
pub struct CythonTool {
    python: PythonInterpreter,
    /// Never `Auto` once constructed through `from_config`.
    builder: CythonBuilder,
    setup_script: PathBuf,
    modules: Vec<PathBuf>,
    language_level: String,
    directives: BTreeMap<String, String>,
    jobs: Option<u32>,
}

impl CythonTool {
    /// Builds the compile step for `config.project.compile`.
    #[must_use]
    pub fn from_config(python: PythonInterpreter, config: &Config) -> Self {
        let cython = &config.cython;
        let builder = match cython.builder {
            CythonBuilder::Auto if cython.setup_script.is_file() => CythonBuilder::SetupPy,
            CythonBuilder::Auto => CythonBuilder::Cythonize,
            explicit => explicit,
        };

        // Paths relative to the working directory keep logs short.
        let setup_script = cython
            .setup_script
            .strip_prefix(config.project_root())
            .unwrap_or(&cython.setup_script)
            .to_path_buf();

        Self {
            python,
            builder,
            setup_script,
            modules: config.compile_modules().to_vec(),
            language_level: cython.language_level.clone(),
            directives: cython.directives.clone(),
            jobs: cython.jobs,
        }
    }

    #[must_use]
    pub const fn builder(&self) -> CythonBuilder {
        self.builder
    }

    #[must_use]
    pub fn modules(&self) -> &[PathBuf] {
        &self.modules
    }

    /// Interpreter arguments for the chosen builder.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        match self.builder {
            CythonBuilder::SetupPy => {
                args.push(path_arg(&self.setup_script));
                args.push("build_ext".to_string());
                args.push("--inplace".to_string());
            }
            CythonBuilder::Auto | CythonBuilder::Cythonize => {
                args.extend(["-m", "Cython.Build.Cythonize", "-i"].map(String::from));
                args.push("-X".to_string());
                args.push(format!("language_level={}", self.language_level));
                for (key, value) in &self.directives {
                    args.push("-X".to_string());
                    args.push(format!("{key}={value}"));
                }
            }
        }

        if let Some(jobs) = self.jobs {
            args.push("-j".to_string());
            args.push(jobs.to_string());
        }

        if self.builder != CythonBuilder::SetupPy {
            args.extend(self.modules.iter().map(|m| path_arg(m)));
        }
        args
    }
}

/// Forward slashes so logs and snapshots read the same on every platform.
fn path_arg(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

impl Tool for CythonTool {
    fn name(&self) -> &'static str {
        "cython"
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.modules.is_empty() {
                return Ok(());
            }

            info!(
                builder = %self.builder,
                modules = %self.modules.iter().map(|m| path_arg(m)).collect::<Vec<_>>().join(", "),
                "compiling"
            );

            let builder = ctx.prepare(
                self.python
                    .command("cython")
                    .args(self.args())
                    .stdout_encoding(COMPILER_OUTPUT)
                    .stderr_encoding(COMPILER_OUTPUT),
            );
            ctx.execute(builder).await.context("Cython compilation failed")?;
            Ok(())
        })
    }
}
