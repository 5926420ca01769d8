// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoding of child-process output into UTF-8.
//!
//! ```text
//! raw bytes --LineDecoder::push()--> complete lines (UTF-8)
//!           --LineDecoder::finish()-> trailing partial line
//! ```
//!
//! Python tools write UTF-8, but the MSVC compiler invoked by `build_ext`
//! writes in the console code page. Invalid sequences become U+FFFD.

use encoding_rs::{IBM866, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Encoding of a process output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Unknown encoding, treated as lossy UTF-8.
    #[default]
    Unknown,
    /// UTF-8.
    Utf8,
    /// Windows ANSI code page (Windows-1252).
    Acp,
    /// OEM console code page. `encoding_rs` only ships IBM866 among the DOS
    /// code pages, so that is what is used.
    Oem,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Utf8 => write!(f, "utf8"),
            Self::Acp => write!(f, "acp"),
            Self::Oem => write!(f, "oem"),
        }
    }
}

/// Converts bytes from the given encoding to UTF-8.
///
/// # Example
/// ```
/// use cyfreeze::utility::encoding::{bytes_to_utf8, Encoding};
///
/// let utf8 = bytes_to_utf8(Encoding::Acp, b"caf\xe9");
/// assert_eq!(utf8, "café");
/// ```
#[must_use]
pub fn bytes_to_utf8(encoding: Encoding, bytes: &[u8]) -> Cow<'_, str> {
    match encoding {
        Encoding::Utf8 | Encoding::Unknown => String::from_utf8_lossy(bytes),
        Encoding::Acp => WINDOWS_1252.decode_without_bom_handling(bytes).0,
        Encoding::Oem => IBM866.decode_without_bom_handling(bytes).0,
    }
}

/// Streaming line splitter for process output.
///
/// Bytes are buffered until a line terminator (`\n`, `\r\n` or a lone `\r`)
/// arrives. Empty lines are dropped.
#[derive(Debug)]
pub struct LineDecoder {
    encoding: Encoding,
    pending: Vec<u8>,
}

impl LineDecoder {
    #[must_use]
    pub const fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            pending: Vec::new(),
        }
    }

    /// Appends bytes and returns every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        let mut start = 0;
        for (i, byte) in self.pending.iter().enumerate() {
            if *byte == b'\n' || *byte == b'\r' {
                if i > start {
                    lines.push(bytes_to_utf8(self.encoding, &self.pending[start..i]).into_owned());
                }
                start = i + 1;
            }
        }
        self.pending.drain(..start);
        lines
    }

    /// Flushes the trailing unterminated line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = bytes_to_utf8(self.encoding, &self.pending).into_owned();
        self.pending.clear();
        Some(line)
    }
}

#[cfg(test)]
mod tests;
