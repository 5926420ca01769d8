// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the build-related commands.
//!
//! # Flag Effects
//!
//! ```text
//! build --skip-deps            drop Deps
//!       --no-clean             drop Clean
//!       --no-compile           drop Compile (extensions must exist)
//!       --keep-intermediates   drop Cleanup
//!       --onedir --name --hidden-import   freeze.* overrides
//! clean --pycache              also __pycache__ and stray .pyc
//! deps  --check                report only, never install
//! ```

use clap::Args;

use crate::pipeline::StageFlags;

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Don't check or install build dependencies.
    #[arg(long = "skip-deps")]
    pub skip_deps: bool,

    /// Keep the output of previous builds.
    #[arg(long = "no-clean")]
    pub no_clean: bool,

    /// Freeze with the extensions already next to the sources.
    #[arg(long = "no-compile")]
    pub no_compile: bool,

    /// Leave generated C files and extensions in place.
    #[arg(long = "keep-intermediates")]
    pub keep_intermediates: bool,

    /// Build a directory bundle instead of a single executable.
    #[arg(long)]
    pub onedir: bool,

    /// Executable name, overrides project.name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Additional hidden import. Can be specified multiple times.
    #[arg(long = "hidden-import", value_name = "MODULE", action = clap::ArgAction::Append)]
    pub hidden_imports: Vec<String>,
}

impl BuildArgs {
    /// Stages selected by the flags.
    #[must_use]
    pub fn stages(&self) -> StageFlags {
        let mut stages = StageFlags::all();
        stages.set(StageFlags::DEPS, !self.skip_deps);
        stages.set(StageFlags::CLEAN, !self.no_clean);
        stages.set(StageFlags::COMPILE, !self.no_compile);
        stages.set(StageFlags::CLEANUP, !self.keep_intermediates);
        stages
    }
}

/// Arguments for the `clean` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CleanArgs {
    /// Also remove `__pycache__` directories and stray `.pyc` files.
    #[arg(long)]
    pub pycache: bool,
}

/// Arguments for the `deps` command.
#[derive(Debug, Clone, Default, Args)]
pub struct DepsArgs {
    /// Only report missing modules, don't install them.
    #[arg(long)]
    pub check: bool,
}
