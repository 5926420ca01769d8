// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use bon::Builder;
use flume::bounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Directories never worth descending into inside a Python project.
const PROJECT_SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".tox",
    ".venv",
    "venv",
    "node_modules",
    ".cyfreeze-stash",
];

/// Options for parallel directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Maximum depth to traverse (None = unlimited)
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Respect .gitignore files
    #[builder(setters(name = with_respect_gitignore), default = true)]
    respect_gitignore: bool,
    /// Skip directories matching these names (exact match)
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }

    /// Options for scanning a Python project tree.
    ///
    /// Ignored files are still visited: build output such as `__pycache__`
    /// is commonly gitignored and is exactly what cleanup looks for.
    #[must_use]
    pub fn for_python_project() -> Self {
        Self::builder()
            .with_respect_gitignore(false)
            .with_skip_dirs(PROJECT_SKIP_DIRS.iter().map(ToString::to_string).collect())
            .build()
    }
}

/// Result of a parallel walk operation.
#[derive(Debug)]
pub struct WalkResult {
    files: Vec<PathBuf>,
    directories: Vec<PathBuf>,
    error_count: usize,
}

impl WalkResult {
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }
}

fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if let Some(depth) = options.max_depth() {
        builder.max_depth(Some(depth));
    }

    builder.follow_links(false);
    builder.hidden(!options.include_hidden());

    builder.git_ignore(options.respect_gitignore());
    builder.git_global(options.respect_gitignore());
    builder.git_exclude(options.respect_gitignore());

    // filter_entry runs before descending
    if !options.skip_dirs().is_empty() {
        let skip_dirs: Arc<Vec<String>> = Arc::new(options.skip_dirs().to_vec());
        builder.filter_entry(move |entry| {
            !(entry.file_type().is_some_and(|ft| ft.is_dir())
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name)))
        });
    }

    builder
}

/// Performs parallel directory traversal using `ignore::WalkParallel`.
///
/// Results are collected through bounded flume channels. The root itself is
/// reported as a directory.
///
/// # Errors
///
/// Returns an error if the root directory does not exist.
///
/// # Example
/// ```no_run
/// use cyfreeze::utility::fs::walk::{parallel_walk, WalkOptions};
///
/// let result = parallel_walk("/path/to/project", &WalkOptions::for_python_project())?;
/// println!("Found {} files", result.files().len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parallel_walk<P: AsRef<Path>>(root: P, options: &WalkOptions) -> Result<WalkResult> {
    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let (file_tx, file_rx) = bounded::<PathBuf>(1000);
    let (dir_tx, dir_rx) = bounded::<PathBuf>(1000);
    let error_count = Arc::new(AtomicUsize::new(0));

    // Receivers are drained on a scoped thread so bounded senders never block forever.
    let (files, directories) = std::thread::scope(|scope| {
        let files = scope.spawn(move || file_rx.iter().collect::<Vec<_>>());
        let directories = scope.spawn(move || dir_rx.iter().collect::<Vec<_>>());

        build_walker(root, options).build_parallel().run(|| {
            let file_tx = file_tx.clone();
            let dir_tx = dir_tx.clone();
            let error_count = Arc::clone(&error_count);

            Box::new(move |entry_result| {
                match entry_result {
                    Ok(entry) => {
                        let path = entry.path().to_path_buf();
                        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                            let _ = dir_tx.send(path);
                        } else if entry.file_type().is_some_and(|ft| ft.is_file()) {
                            let _ = file_tx.send(path);
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "walk error");
                        error_count.fetch_add(1, Ordering::Relaxed);
                    }
                }
                ignore::WalkState::Continue
            })
        });

        drop(file_tx);
        drop(dir_tx);

        (
            files.join().unwrap_or_default(),
            directories.join().unwrap_or_default(),
        )
    });

    Ok(WalkResult {
        files,
        directories,
        error_count: error_count.load(Ordering::Relaxed),
    })
}

/// Finds every directory called `name` below `root`, sorted.
///
/// Matching directories are not descended into.
///
/// # Errors
///
/// Returns an error if the root directory does not exist.
pub fn find_dirs_named<P: AsRef<Path>>(
    root: P,
    name: &str,
    options: &WalkOptions,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let (tx, rx) = bounded::<PathBuf>(1000);
    let target = Arc::new(name.to_string());

    let mut found = std::thread::scope(|scope| {
        let collector = scope.spawn(move || rx.iter().collect::<Vec<_>>());

        build_walker(root, options).build_parallel().run(|| {
            let tx = tx.clone();
            let target = Arc::clone(&target);

            Box::new(move |entry_result| {
                if let Ok(entry) = entry_result
                    && entry.depth() > 0
                    && entry.file_type().is_some_and(|ft| ft.is_dir())
                    && entry.file_name().to_str() == Some(target.as_str())
                {
                    let _ = tx.send(entry.path().to_path_buf());
                    return ignore::WalkState::Skip;
                }
                ignore::WalkState::Continue
            })
        });

        drop(tx);
        collector.join().unwrap_or_default()
    });

    found.sort();
    Ok(found)
}
