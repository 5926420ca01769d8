// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stage orchestration.
//!
//! ```text
//! Pipeline::new(config, stages)
//!   .with_cancel_token()  .with_dry_run()
//!   .run().await
//!       checkpoint before every stage: cancelled --> bail out
//!       Hide ... Restore: restore runs whatever the freeze did
//! ```

use std::sync::Arc;

use crate::error::Result;
use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::clean::{CleanScope, clean_project};
use super::stash::SourceStash;
use super::tools::cython::CythonTool;
use super::tools::pip::PipTool;
use super::tools::pyinstaller::PyInstallerTool;
use super::tools::python::PythonInterpreter;
use super::tools::{Tool, ToolContext};
use super::{PipelineReport, Stage, StageFlags, artifacts, imports};
use crate::config::Config;
use crate::error::{ToolchainError, bail_out};

/// Runs the build stages for one project.
pub struct Pipeline {
    config: Arc<Config>,
    stages: StageFlags,
    cancel_token: CancellationToken,
    dry_run: bool,
}

impl Pipeline {
    /// Creates a pipeline; dry-run mode follows `global.dry`.
    #[must_use]
    pub fn new(config: Arc<Config>, stages: StageFlags) -> Self {
        let dry_run = config.global.dry;
        Self {
            config,
            stages,
            cancel_token: CancellationToken::new(),
            dry_run,
        }
    }

    /// Shares a cancellation token, typically cancelled on Ctrl+C.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub const fn stages(&self) -> StageFlags {
        self.stages
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// A tool context sharing this pipeline's config, token and mode.
    #[must_use]
    pub fn context(&self) -> ToolContext {
        ToolContext::new(Arc::clone(&self.config), self.cancel_token.clone(), self.dry_run)
    }

    fn checkpoint(&self, stage: Stage) -> Result<()> {
        if self.cancel_token.is_cancelled() {
            return Err(bail_out(format!("build interrupted before {stage}")).into());
        }
        info!(%stage, "stage");
        Ok(())
    }

    /// Resolves the interpreter. A dry run falls back to `python3` so the
    /// remaining commands can still be shown.
    ///
    /// # Errors
    ///
    /// Returns `ToolchainError::InterpreterNotFound` outside a dry run.
    pub fn interpreter(&self) -> Result<PythonInterpreter> {
        match PythonInterpreter::resolve(&self.config) {
            Ok(python) => Ok(python),
            Err(e) if self.dry_run => {
                warn!(error = %e, "continuing the dry run with python3");
                Ok(PythonInterpreter::new("python3"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Runs the selected stages.
    ///
    /// # Errors
    ///
    /// Returns the first stage error. When freezing and restoring both fail,
    /// the error names both. A missing executable after a successful freeze
    /// is `ToolchainError::MissingOutput`.
    pub async fn run(&self) -> Result<PipelineReport> {
        let config = Arc::clone(&self.config);
        let ctx = self.context();
        let root = config.project_root();
        let modules = config.compile_modules();
        let mut report = PipelineReport::default();

        if let Some(count) = SourceStash::recover(root, config.stash_dir(), self.dry_run)? {
            report.recovered = count;
        }

        let python = self.interpreter()?;
        info!(python = %python.program().display(), dry_run = self.dry_run, "building {}", config.app_name());

        if self.stages.contains(StageFlags::DEPS) {
            self.checkpoint(Stage::Deps)?;
            install_dependencies(&ctx, &python).await?;
            report.record(Stage::Deps);
        }

        let compiling = self.stages.contains(StageFlags::COMPILE) && !modules.is_empty();

        if self.stages.contains(StageFlags::CLEAN) {
            self.checkpoint(Stage::Clean)?;
            let scope = CleanScope {
                intermediates: compiling && config.clean.intermediates,
                pycache: config.clean.pycache,
            };
            clean_project(&config, scope, self.dry_run)?;
            report.record(Stage::Clean);
        }

        if compiling {
            self.checkpoint(Stage::Compile)?;
            CythonTool::from_config(python.clone(), &config).run(&ctx).await?;
            if !self.dry_run {
                artifacts::require_extensions(root, modules)?;
            }
            report.record(Stage::Compile);
        }

        if self.stages.contains(StageFlags::FREEZE) {
            self.freeze(&ctx, python, compiling, &mut report).await?;
        }
        Ok(report)
    }

    /// Hide, freeze, restore, cleanup, then the success or failure branch.
    async fn freeze(
        &self,
        ctx: &ToolContext,
        python: PythonInterpreter,
        compiling: bool,
        report: &mut PipelineReport,
    ) -> Result<()> {
        let config = ctx.config();
        let root = config.project_root();
        let modules = config.compile_modules();

        // Sources must still be in place to be scanned.
        let hidden_imports = imports::resolve_hidden_imports(config)?;
        let freeze = PyInstallerTool::from_config(python, config, hidden_imports.clone());
        report.hidden_imports = hidden_imports;

        let stash = if modules.is_empty() {
            None
        } else {
            if !compiling && !self.dry_run {
                // Freezing without extensions would drop the modules entirely.
                artifacts::require_extensions(root, modules)?;
            }
            self.checkpoint(Stage::Hide)?;
            let stash = SourceStash::hide(root, config.stash_dir(), modules, self.dry_run)?;
            report.record(Stage::Hide);
            Some(stash)
        };

        let frozen = match self.checkpoint(Stage::Freeze) {
            Ok(()) => freeze.run(ctx).await,
            Err(e) => Err(e),
        };
        if frozen.is_ok() {
            report.record(Stage::Freeze);
        }

        let restored = stash.map(|stash| {
            info!(stage = %Stage::Restore, "stage");
            let result = stash.restore();
            if result.is_ok() {
                report.record(Stage::Restore);
            }
            result
        });

        if self.stages.contains(StageFlags::CLEANUP) && config.clean.intermediates && !modules.is_empty() {
            info!(stage = %Stage::Cleanup, "stage");
            match artifacts::remove_intermediates(root, modules, self.dry_run) {
                Ok(count) => {
                    report.removed_intermediates = count;
                    report.record(Stage::Cleanup);
                }
                Err(e) => warn!(error = %format!("{e:#}"), "cleanup failed"),
            }
        }

        match (frozen, restored) {
            (Err(freeze_err), Some(Err(restore_err))) => {
                error!("build failed and sources were not fully restored, run `cyfreeze restore`");
                return Err(freeze_err.context(format!("restoring sources also failed: {restore_err}")));
            }
            (Err(freeze_err), _) => {
                error!("build failed");
                return Err(freeze_err);
            }
            (Ok(()), Some(Err(restore_err))) => {
                return Err(restore_err).context("frozen, but restoring sources failed");
            }
            (Ok(()), _) => {}
        }

        let output = freeze.expected_output();
        if !self.dry_run {
            let metadata = std::fs::metadata(&output)
                .map_err(|_| ToolchainError::MissingOutput(output.clone()))?;
            if metadata.is_file() {
                report.output_size = Some(metadata.len());
            }
            info!(output = %output.display(), size = ?report.output_size, "build succeeded");
        }
        report.output = Some(output);
        Ok(())
    }
}

/// Installs missing build dependencies, then the project's requirements
/// when configured.
///
/// # Errors
///
/// Returns `ToolchainError::MissingModules` when modules are missing and
/// `deps.auto_install` is off, or the pip error.
pub async fn install_dependencies(ctx: &ToolContext, python: &PythonInterpreter) -> Result<()> {
    let deps = &ctx.config().deps;

    if let Some(version) = python.version(ctx).await? {
        info!(%version, "python");
    }

    let import_names: Vec<String> = deps.packages.values().cloned().collect();
    let missing = python.missing_modules(ctx, &import_names).await?;

    if missing.is_empty() {
        info!("build dependencies present");
    } else if deps.auto_install {
        let packages = deps
            .packages
            .iter()
            .filter(|(_, module)| missing.contains(module))
            .map(|(package, _)| package.clone());
        PipTool::packages(python.clone(), packages)
            .run(ctx)
            .await
            .context("installing build dependencies")?;
    } else {
        return Err(ToolchainError::MissingModules(missing).into());
    }

    if deps.install_requirements
        && let Some(requirements) = &deps.requirements
    {
        PipTool::requirements(python.clone(), requirements)
            .run(ctx)
            .await?;
    }
    Ok(())
}
