// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   build, clean, restore, deps, imports, config
//! ```

pub mod build;
pub mod clean;
pub mod config;
pub mod deps;
pub mod imports;
pub mod restore;
