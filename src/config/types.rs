// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config
//!   global   GlobalConfig   dry, log levels, log file
//!   project  ProjectConfig  root, entry, name, compile
//!   tools    ToolsConfig    python, timeout_secs
//!   deps     DepsConfig     auto_install, packages, requirements
//!   cython   CythonConfig   builder, setup_script, language_level, directives
//!   freeze   FreezeConfig   PyInstaller options
//!   stash    StashConfig    dir
//!   clean    CleanConfig    dirs, remove_spec, intermediates, pycache
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::logging::{LogConfig, LogLevel};

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log every action without touching files or spawning tools.
    pub dry: bool,
    /// Log level for stderr output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Log file; no file logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

impl GlobalConfig {
    /// Logging setup for these levels and file.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::builder()
            .with_console_level(self.output_log_level)
            .with_file_level(self.file_log_level)
            .maybe_with_log_file(self.log_file.as_ref().map(|p| p.display().to_string()))
            .build()
    }
}

/// The Python project being frozen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project directory; every other project path is relative to it.
    pub root: PathBuf,
    /// Entry script handed to PyInstaller. Always kept as source.
    pub entry: PathBuf,
    /// Executable name; defaults to the entry's file stem.
    pub name: Option<String>,
    /// Module sources compiled with Cython and hidden while freezing.
    pub compile: Vec<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            entry: PathBuf::from("main.py"),
            name: None,
            compile: Vec::new(),
        }
    }
}

/// External tool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Explicit interpreter; auto-detected when unset.
    pub python: Option<PathBuf>,
    /// Per-invocation timeout in seconds, 0 for none.
    pub timeout_secs: u64,
}

/// Build dependency handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepsConfig {
    /// Install missing packages instead of failing.
    pub auto_install: bool,
    /// pip package name to import name.
    pub packages: BTreeMap<String, String>,
    /// Optional requirements file of the project itself.
    pub requirements: Option<PathBuf>,
    /// Install `requirements` on every build.
    pub install_requirements: bool,
}

impl Default for DepsConfig {
    fn default() -> Self {
        Self {
            auto_install: true,
            packages: BTreeMap::from([
                ("cython".to_string(), "Cython".to_string()),
                ("pyinstaller".to_string(), "PyInstaller".to_string()),
            ]),
            requirements: None,
            install_requirements: false,
        }
    }
}

/// How Cython is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CythonBuilder {
    /// `setup-py` when the setup script exists, otherwise `cythonize`.
    #[default]
    Auto,
    /// `python setup.py build_ext --inplace`.
    SetupPy,
    /// `python -m Cython.Build.Cythonize -i`.
    Cythonize,
}

impl std::fmt::Display for CythonBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::SetupPy => write!(f, "setup-py"),
            Self::Cythonize => write!(f, "cythonize"),
        }
    }
}

/// Cython compilation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CythonConfig {
    pub builder: CythonBuilder,
    pub setup_script: PathBuf,
    pub language_level: String,
    /// Extra compiler directives, passed as `-X key=value`.
    pub directives: BTreeMap<String, String>,
    /// Parallel compile jobs.
    pub jobs: Option<u32>,
}

impl Default for CythonConfig {
    fn default() -> Self {
        Self {
            builder: CythonBuilder::Auto,
            setup_script: PathBuf::from("setup.py"),
            language_level: "3".to_string(),
            directives: BTreeMap::new(),
            jobs: None,
        }
    }
}

/// One `--add-data` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataMapping {
    pub source: PathBuf,
    pub dest: String,
}

/// PyInstaller options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FreezeConfig {
    /// Single-file executable rather than a directory bundle.
    pub onefile: bool,
    /// Keep a console window (`--noconsole` when false).
    pub console: bool,
    /// Pass `--clean` to drop PyInstaller's cache.
    pub clean_cache: bool,
    pub icon: Option<PathBuf>,
    pub hidden_imports: Vec<String>,
    /// Add imports scanned from compiled modules to `hidden_imports`.
    pub auto_hidden_imports: bool,
    pub collect_all: Vec<String>,
    pub data: Vec<DataMapping>,
    /// Appended verbatim before the entry script.
    pub extra_args: Vec<String>,
    pub dist_dir: PathBuf,
    pub work_dir: PathBuf,
    pub spec_dir: PathBuf,
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            onefile: true,
            console: true,
            clean_cache: true,
            icon: None,
            hidden_imports: Vec::new(),
            auto_hidden_imports: true,
            collect_all: Vec::new(),
            data: Vec::new(),
            extra_args: Vec::new(),
            dist_dir: PathBuf::from("dist"),
            work_dir: PathBuf::from("build"),
            spec_dir: PathBuf::from("."),
        }
    }
}

/// Where hidden sources are parked during the freeze.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StashConfig {
    pub dir: PathBuf,
}

impl Default for StashConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".cyfreeze-stash"),
        }
    }
}

/// What the clean stage removes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanConfig {
    pub dirs: Vec<PathBuf>,
    /// Remove `<name>.spec` from the spec directory.
    pub remove_spec: bool,
    /// Remove generated C files and compiled extensions.
    pub intermediates: bool,
    /// Remove `__pycache__` directories.
    pub pycache: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("build"), PathBuf::from("dist")],
            remove_spec: true,
            intermediates: true,
            pycache: false,
        }
    }
}
