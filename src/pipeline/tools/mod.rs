// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wrappers around the external Python toolchain.
//!
//! ```text
//! Stage --> ToolContext --> ProcessBuilder --> python -m <tool>
//!   PythonInterpreter  resolve, version, missing_modules
//!   PipTool            pip install
//!   CythonTool         setup.py build_ext | Cython.Build.Cythonize
//!   PyInstallerTool    PyInstaller
//! ToolContext: cancel token --> run_with_cancellation
//!              dry run      --> log the command line only
//! ```

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::core::process::builder::{ProcessBuilder, ProcessOutput};
use crate::error::{ProcessError, Result};

pub mod cython;
pub mod pip;
pub mod pyinstaller;
pub mod python;

/// Context provided to tools during execution.
#[derive(Clone)]
pub struct ToolContext {
    cancel_token: CancellationToken,
    /// Log commands instead of running them.
    dry_run: bool,
    config: Arc<Config>,
}

impl ToolContext {
    #[must_use]
    pub const fn new(config: Arc<Config>, cancel_token: CancellationToken, dry_run: bool) -> Self {
        Self {
            cancel_token,
            dry_run,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Applies the project-wide settings every tool invocation shares:
    /// project root as working directory, UTF-8 Python I/O, and the
    /// configured timeout.
    #[must_use]
    pub fn prepare(&self, builder: ProcessBuilder) -> ProcessBuilder {
        let builder = builder
            .cwd(self.config.project_root())
            .env("PYTHONIOENCODING", "utf-8")
            .env("PYTHONUTF8", "1");
        match self.config.tool_timeout() {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// Runs `builder` unless this is a dry run, in which case the command line
    /// is logged and an empty successful output returned.
    ///
    /// # Errors
    ///
    /// Returns the process error, or `ProcessError::Interrupted` when the
    /// cancellation token fired while the tool ran.
    pub async fn execute(&self, builder: ProcessBuilder) -> Result<ProcessOutput> {
        if self.dry_run {
            info!(cmd = %builder.command_line(), "[dry-run] would run");
            return Ok(ProcessOutput::default());
        }

        let name = builder.display_name();
        let output = builder
            .run_with_cancellation(self.cancel_token.clone())
            .await?;
        if output.is_interrupted() {
            return Err(ProcessError::Interrupted { name }.into());
        }
        Ok(output)
    }
}

/// A tool invocation that changes the project (installs, compiles, freezes).
///
/// Implementations build their command line from configuration, respect
/// `ctx.is_dry_run()` through `ToolContext::execute`, and run with the
/// context's cancellation token.
pub trait Tool: Send + Sync {
    /// Returns the name of this tool (e.g., "pip", "cython", "pyinstaller").
    fn name(&self) -> &str;

    /// Executes the tool's operation.
    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>>;
}

#[cfg(test)]
pub(crate) mod test_utils;
