// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `options` and `inis` commands.

use crate::config::Config;

/// Prints every option with its effective value, then flags sources still
/// hidden by an interrupted build.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }

    if config.stash_dir().exists() {
        println!();
        println!(
            "# sources are still hidden in {}, run `cyfreeze restore`",
            config.stash_dir().display()
        );
    }
}

/// Prints the configuration files in load order.
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded (looked for cyfreeze.toml)");
        return;
    }
    for line in config_files {
        println!("{line}");
    }
}
