// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Restore command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::stash::SourceStash;

/// Moves sources hidden by an interrupted build back into place.
///
/// # Errors
///
/// Returns the stash error when the manifest is unreadable or a source
/// cannot be moved back without overwriting a file.
pub fn run_restore_command(config: &Config, dry_run: bool) -> Result<()> {
    match SourceStash::recover(config.project_root(), config.stash_dir(), dry_run)? {
        Some(count) => println!("Restored {count} source(s)"),
        None => println!("Nothing to restore"),
    }
    Ok(())
}
