// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for cyfreeze using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! cyfreeze [global options] <command>
//! build [--skip-deps] [--no-clean] [--no-compile] [--keep-intermediates] ...
//! clean [--pycache]
//! restore
//! deps [--check]
//! imports
//! options | inis | version
//! ```

pub mod build;
pub mod global;


use crate::cli::build::{BuildArgs, CleanArgs, DepsArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Source-hiding Python freezer
///
/// Compiles Python modules with Cython and freezes the project with
/// PyInstaller while the module sources are hidden.
#[derive(Debug, Parser)]
#[command(
    name = "cyfreeze",
    author,
    version,
    about = "Compile, hide and freeze Python applications",
    long_about = "cyfreeze Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Compiles the modules listed in [project] compile with Cython,\n\
                  moves their sources aside, freezes the entry script with\n\
                  PyInstaller and puts the sources back. Run `cyfreeze build` in\n\
                  the project directory, or point -C at it.",
    after_help = "CONFIG FILES:\n\n\
                  cyfreeze reads `cyfreeze.toml` from the current directory when\n\
                  present. Files given with --config are loaded after it, in order.\n\
                  CYFREEZE_<SECTION>_<KEY> environment variables override both,\n\
                  --set KEY=VALUE overrides those, and dedicated flags such as\n\
                  --dry and --project win over everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Compiles, hides, freezes and restores.
    Build(BuildArgs),

    /// Removes build output and compiled intermediates.
    Clean(CleanArgs),

    /// Restores sources hidden by an interrupted build.
    Restore,

    /// Checks and installs build dependencies.
    Deps(DepsArgs),

    /// Prints the hidden-import list passed to PyInstaller.
    Imports,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments from an iterator.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
