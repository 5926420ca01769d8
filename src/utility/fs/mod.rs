// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities.
//!
//! ```text
//! walk:   parallel_walk()     ignore::WalkParallel (multi-core)
//!         find_dirs_named()   e.g. every __pycache__ under a project
//!         WalkOptions         max_depth, hidden, gitignore, skip_dirs
//! moves:  move_file()         rename, copy+remove across devices
//!         remove_path()       file or directory, missing is not an error
//! ```
//!
//! `moves` is synchronous on purpose: it runs from `Drop` when restoring
//! hidden sources.

pub mod moves;
pub mod walk;
