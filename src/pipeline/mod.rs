// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build pipeline.
//!
//! # Architecture
//!
//! ```text
//! Pipeline::run()
//!   recover stale stash
//!   Deps --> Clean --> Compile --> [hidden imports]
//!        --> Hide --> Freeze --> Restore (always) --> Cleanup
//!        --> output present?  success : failure
//!
//!   tools/      python, pip, cython, pyinstaller
//!   artifacts   compiled extensions and generated C next to sources
//!   imports     hidden-import hints
//!   stash       source hiding with a crash-safe manifest
//!   clean       build output removal
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Pipeline`] | Runs the selected stages with cancellation |
//! | [`Stage`] | One step of the build, in execution order |
//! | [`StageFlags`] | Bitflags selecting optional stages |
//! | [`PipelineReport`] | What a run did and produced |

pub mod artifacts;
pub mod clean;
pub mod imports;
mod runner;
pub mod stash;
pub mod tools;

use std::path::{Path, PathBuf};

use bitflags::bitflags;

pub use runner::{Pipeline, install_dependencies};

/// Build stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Deps,
    Clean,
    Compile,
    Hide,
    Freeze,
    Restore,
    Cleanup,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Deps => "deps",
            Self::Clean => "clean",
            Self::Compile => "compile",
            Self::Hide => "hide",
            Self::Freeze => "freeze",
            Self::Restore => "restore",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Stages a run executes. Hide and restore follow `FREEZE` whenever
    /// modules are compiled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StageFlags: u8 {
        /// Check and install build dependencies.
        const DEPS = 0x01;

        /// Remove previous build output.
        const CLEAN = 0x02;

        /// Compile modules with Cython.
        const COMPILE = 0x04;

        /// Hide sources, run PyInstaller, restore sources.
        const FREEZE = 0x08;

        /// Delete generated C files and extensions afterwards.
        const CLEANUP = 0x10;
    }
}

impl Default for StageFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    stages: Vec<Stage>,
    recovered: usize,
    hidden_imports: Vec<String>,
    output: Option<PathBuf>,
    output_size: Option<u64>,
    removed_intermediates: usize,
}

impl PipelineReport {
    pub(crate) fn record(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Stages that ran, in order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Sources restored from an earlier interrupted run.
    #[must_use]
    pub const fn recovered(&self) -> usize {
        self.recovered
    }

    #[must_use]
    pub fn hidden_imports(&self) -> &[String] {
        &self.hidden_imports
    }

    /// The frozen executable or bundle.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Size in bytes; `None` for a directory bundle or a dry run.
    #[must_use]
    pub const fn output_size(&self) -> Option<u64> {
        self.output_size
    }

    #[must_use]
    pub const fn removed_intermediates(&self) -> usize {
        self.removed_intermediates
    }
}
