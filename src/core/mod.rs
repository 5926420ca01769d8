// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core runtime support.
//!
//! ```text
//!      core
//!       |
//!    process
//!       |
//!  ProcessBuilder --> tokio::process
//!  ProcessOutput      cancellation, timeout
//! ```

pub mod process;
