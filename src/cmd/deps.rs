// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deps command implementation.

use std::sync::Arc;

use crate::cli::build::DepsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{Pipeline, StageFlags, install_dependencies};

/// Checks the build dependencies and installs the missing ones.
///
/// # Errors
///
/// Returns an error if no interpreter is found, or pip fails.
pub async fn run_deps_command(args: &DepsArgs, config: &Config, dry_run: bool) -> Result<()> {
    let pipeline = Pipeline::new(Arc::new(config.clone()), StageFlags::DEPS).with_dry_run(dry_run);
    let ctx = pipeline.context();
    let python = pipeline.interpreter()?;

    if !args.check {
        return install_dependencies(&ctx, &python).await;
    }

    if let Some(version) = python.version(&ctx).await? {
        println!("Python {version} ({})", python.program().display());
    }

    let import_names: Vec<String> = config.deps.packages.values().cloned().collect();
    let missing = python.missing_modules(&ctx, &import_names).await?;
    if missing.is_empty() {
        println!("All build dependencies present");
    } else {
        for (package, module) in &config.deps.packages {
            if missing.contains(module) {
                println!("missing: {package} (import {module})");
            }
        }
    }
    Ok(())
}
