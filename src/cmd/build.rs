// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build command implementation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::build::BuildArgs;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineReport};

/// Main handler for build command.
///
/// # Errors
///
/// Returns the pipeline error. Sources are restored before it is returned.
pub async fn run_build_command(args: &BuildArgs, config: &Config, dry_run: bool) -> Result<()> {
    let config = Arc::new(apply_build_args(args, config)?);

    let cancel_token = CancellationToken::new();
    let listener = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, stopping after the current stage...");
            listener.cancel();
        }
    });

    let pipeline = Pipeline::new(config, args.stages())
        .with_cancel_token(cancel_token)
        .with_dry_run(dry_run);

    match pipeline.run().await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            eprintln!("Build failed: {e}");
            Err(e)
        }
    }
}

/// Applies the build-only flags on top of the loaded configuration.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an invalid `--name`.
pub fn apply_build_args(args: &BuildArgs, config: &Config) -> Result<Config> {
    let mut config = config.clone();
    if args.onedir {
        config.freeze.onefile = false;
    }
    if let Some(name) = &args.name {
        config.project.name = Some(name.clone());
    }
    config
        .freeze
        .hidden_imports
        .extend(args.hidden_imports.iter().cloned());
    config.resolve_and_validate()?;
    Ok(config)
}

fn print_report(report: &PipelineReport) {
    if report.recovered() > 0 {
        println!("Restored {} source(s) left hidden by an earlier run", report.recovered());
    }

    let stages: Vec<String> = report.stages().iter().map(ToString::to_string).collect();
    println!("Stages: {}", stages.join(", "));

    if report.removed_intermediates() > 0 {
        println!("Removed {} intermediate file(s)", report.removed_intermediates());
    }

    if let Some(output) = report.output() {
        match report.output_size() {
            Some(size) => println!("Output: {} ({size} bytes)", output.display()),
            None => println!("Output: {}", output.display()),
        }
    }
}
