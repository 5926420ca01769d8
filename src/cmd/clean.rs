// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clean command implementation.

use crate::cli::build::CleanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::clean::{CleanScope, clean_project};
use crate::pipeline::stash::SourceStash;

/// Removes build output, intermediates and optionally bytecode caches.
///
/// Sources left hidden by an interrupted build are restored first, so their
/// extensions are never the only copy removed.
///
/// # Errors
///
/// Returns an error if the stash cannot be recovered or a path cannot be
/// removed.
pub fn run_clean_command(args: &CleanArgs, config: &Config, dry_run: bool) -> Result<()> {
    SourceStash::recover(config.project_root(), config.stash_dir(), dry_run)?;

    let mut scope = CleanScope::from_config(config);
    scope.pycache |= args.pycache;

    let count = clean_project(config, scope, dry_run)?;
    if dry_run {
        println!("Would remove {count} path(s)");
    } else {
        println!("Removed {count} path(s)");
    }
    Ok(())
}
