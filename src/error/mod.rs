// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             FreezeError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+------+
//!   |      |      |       |      |      |      |
//!   v      v      v       v      v      v      v
//! Bail   Cfg   Proc     Fs    Stash  Tool   Io
//!        Box   Box      Box    Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Config     InvalidValue, InvalidOverride
//!   Process    ExecutableNotFound, SpawnFailed, NonZeroExit, TimedOut,
//!              Interrupted
//!   Fs         NotFound, IoError
//!   Stash      AlreadyExists, MissingSource, Conflict, Manifest, OutsideRoot
//!   Toolchain  InterpreterNotFound, UnknownVersion, MissingModules,
//!              MissingExtension, MissingOutput
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`FreezeError`].
pub type FreezeResult<T> = std::result::Result<T, FreezeError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum FreezeError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// External process error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Source hiding / restoring error.
    #[error("stash error: {0}")]
    Stash(#[from] Box<StashError>),

    /// Python toolchain error.
    #[error("toolchain error: {0}")]
    Toolchain(#[from] Box<ToolchainError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

/// Create a fatal [`FreezeError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> FreezeError {
    FreezeError::Bailed(message.into().into_boxed_str())
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for FreezeError {
                fn from(err: $error) -> Self {
                    FreezeError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    StashError => Stash,
    ToolchainError => Toolchain,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Malformed `--set` override.
    #[error("invalid override '{0}', expected KEY=VALUE")]
    InvalidOverride(String),
}

// --- Process Errors ---

/// External process errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with an unexpected status.
    #[error("{name} exited with code {code}")]
    NonZeroExit { name: String, code: i32 },

    /// Process was killed after running longer than its timeout.
    #[error("{name} timed out after {}s", .after.as_secs())]
    TimedOut { name: String, after: std::time::Duration },

    /// Process was killed because cancellation was requested.
    #[error("{name} was interrupted")]
    Interrupted { name: String },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Stash Errors ---

/// Errors raised while hiding or restoring sources.
#[derive(Debug, Error)]
pub enum StashError {
    /// A stash directory from an earlier run is still present.
    #[error("stash directory already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// A module scheduled for hiding does not exist.
    #[error("source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// A file reappeared at the original location of a stashed source.
    #[error("cannot restore {}: file already exists (stashed copy kept at {})", .original.display(), .stashed.display())]
    Conflict { original: PathBuf, stashed: PathBuf },

    /// The stash manifest is unreadable or malformed.
    #[error("invalid stash manifest '{}': {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    /// A module path would leave the project root.
    #[error("module path escapes the project root: {}", .0.display())]
    OutsideRoot(PathBuf),
}

// --- Toolchain Errors ---

/// Python toolchain errors.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// No usable Python interpreter was found.
    #[error("no Python interpreter found (tried: {tried})")]
    InterpreterNotFound { tried: String },

    /// Interpreter output could not be understood.
    #[error("unrecognised interpreter version output: '{0}'")]
    UnknownVersion(String),

    /// Required modules are not importable and auto-install is off.
    #[error("missing Python modules: {}", .0.join(", "))]
    MissingModules(Vec<String>),

    /// Compilation produced no extension module for these sources.
    #[error("no compiled extension found for: {}", .0.join(", "))]
    MissingExtension(Vec<String>),

    /// The freezing tool reported success but produced nothing.
    #[error("expected output not found: {}", .0.display())]
    MissingOutput(PathBuf),
}
