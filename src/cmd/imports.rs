// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Imports command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::imports::resolve_hidden_imports;

/// Prints the hidden imports a build would pass, one per line.
///
/// # Errors
///
/// Returns an error if a compiled module's source cannot be read.
pub fn run_imports_command(config: &Config) -> Result<()> {
    for module in resolve_hidden_imports(config)? {
        println!("{module}");
    }
    Ok(())
}
