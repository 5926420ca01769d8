// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! encoding
//!   bytes_to_utf8()  CP1252/OEM --> UTF-8
//!   LineDecoder      streaming line splitter
//! fs
//!   walk:   parallel_walk(), find_dirs_named(), WalkOptions
//!   moves:  move_file(), remove_path()
//! ```

pub mod encoding;
pub mod fs;
