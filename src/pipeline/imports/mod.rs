// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hidden-import hints for the freeze step.
//!
//! PyInstaller cannot look inside compiled extension modules, so whatever
//! they import has to be named explicitly.
//!
//! ```text
//! freeze.hidden_imports            configured order
//!   + scan_imports(compiled src)   import a.b, c / from a.b import x
//!   + with_parents                 a, a.b
//!   + module_name(compiled)        bot, pkg.solver
//!   --> dedup, first occurrence wins
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;

/// PEP 263 source encoding declaration.
static CODING_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[ \t\x0c]*#.*?coding[:=][ \t]*([-\w.]+)").ok());

/// A dotted module path.
static MODULE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\W\d]\w*(?:\.[^\W\d]\w*)*$").ok());

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Maps a Python codec name onto a WHATWG label `encoding_rs` knows.
fn encoding_label(name: &str) -> String {
    let name = name.to_ascii_lowercase().replace('_', "-");
    match name.as_str() {
        "latin-1" | "iso-latin-1" => "latin1".to_string(),
        "utf-8-sig" | "utf8" => "utf-8".to_string(),
        _ => name,
    }
}

/// Decodes Python source bytes, honouring a BOM or a `coding:` cookie on the
/// first two lines. Falls back to lossy UTF-8.
#[must_use]
pub fn decode_source(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }

    let head = String::from_utf8_lossy(bytes);
    let cookie = CODING_RE.as_ref().and_then(|re| {
        head.lines()
            .take(2)
            .find_map(|line| re.captures(line)?.get(1).map(|m| m.as_str().to_string()))
    });

    if let Some(name) = cookie {
        match encoding_rs::Encoding::for_label(encoding_label(&name).as_bytes()) {
            Some(encoding) => return encoding.decode_without_bom_handling(bytes).0.into_owned(),
            None => warn!(encoding = %name, "unknown source encoding, reading as UTF-8"),
        }
    }
    head.into_owned()
}

fn is_module_path(name: &str) -> bool {
    MODULE_RE.as_ref().is_some_and(|re| re.is_match(name))
}

/// Absolute imports of one statement.
fn statement_imports(statement: &str, out: &mut Vec<String>) {
    let mut words = statement.split_whitespace();
    match words.next() {
        Some("import") => {
            let rest = statement.trim_start()["import".len()..].trim();
            let rest = rest.trim_start_matches('(').trim_end_matches(')');
            for item in rest.split(',') {
                let Some(module) = item.split_whitespace().next() else {
                    continue;
                };
                if is_module_path(module) {
                    out.push(module.to_string());
                }
            }
        }
        Some("from") => {
            if let Some(module) = words.next()
                && words.next() == Some("import")
                && module != "__future__"
                && is_module_path(module)
            {
                out.push(module.to_string());
            }
        }
        _ => {}
    }
}

/// `line` up to its comment. A `#` inside a string literal opened on this
/// line is not a comment; an unterminated literal keeps the rest.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<&[u8]> = None;
    let mut i = 0;
    while i < bytes.len() {
        let rest = &bytes[i..];
        match quote {
            Some(delim) => {
                if rest[0] == b'\\' {
                    i += 2;
                    continue;
                }
                if rest.starts_with(delim) {
                    i += delim.len();
                    quote = None;
                    continue;
                }
            }
            None => {
                if rest[0] == b'#' {
                    return &line[..i];
                }
                if let Some(delim) = [&b"\"\"\""[..], &b"'''"[..], &b"\""[..], &b"'"[..]]
                    .into_iter()
                    .find(|d| rest.starts_with(*d))
                {
                    i += delim.len();
                    quote = Some(delim);
                    continue;
                }
            }
        }
        i += 1;
    }
    line
}

/// Advances through `line` tracking triple-quoted strings. Returns the state
/// at the end of the line.
fn track_strings(mut line: &str, mut open: Option<&'static str>) -> Option<&'static str> {
    loop {
        if let Some(delim) = open {
            match line.find(delim) {
                Some(pos) => {
                    line = &line[pos + delim.len()..];
                    open = None;
                }
                None => return open,
            }
        } else {
            let next = ["\"\"\"", "'''"]
                .into_iter()
                .filter_map(|d| line.find(d).map(|pos| (pos, d)))
                .min_by_key(|(pos, _)| *pos);
            match next {
                Some((pos, delim)) => {
                    line = &line[pos + delim.len()..];
                    open = Some(delim);
                }
                None => return None,
            }
        }
    }
}

/// Absolute imports in Python source, in order of appearance.
///
/// Recognises `import a.b as c, d` and `from a.b import x` at any
/// indentation, with `;` separated statements and `\` continuations. A
/// comment starts at a `#` outside string literals. Text inside
/// triple-quoted strings, relative imports, and `__future__` are skipped.
#[must_use]
pub fn scan_imports(source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut open: Option<&'static str> = None;
    let mut pending = String::new();

    for raw in source.lines() {
        let mut line = raw;
        if let Some(delim) = open {
            let Some(pos) = line.find(delim) else {
                continue;
            };
            line = &line[pos + delim.len()..];
            open = None;
        }

        let code = strip_comment(line);
        if let Some(continued) = code.trim_end().strip_suffix('\\') {
            pending.push_str(continued);
            pending.push(' ');
            continue;
        }
        pending.push_str(code);

        for statement in pending.split(';') {
            statement_imports(statement, &mut imports);
        }
        pending.clear();

        open = track_strings(code, None);
    }

    imports
}

/// Every module together with its parent packages, parents first.
#[must_use]
pub fn with_parents(modules: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for module in modules {
        let mut end = 0;
        for part in module.split('.') {
            end += part.len();
            out.push(module[..end].to_string());
            end += 1;
        }
    }
    out
}

/// Dotted module name of a source file relative to the project root.
/// `pkg/__init__.py` names the package itself.
#[must_use]
pub fn module_name(relative: &Path) -> Option<String> {
    let without_ext = relative.with_extension("");
    let mut parts: Vec<String> = without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.last().is_some_and(|p| p == "__init__") {
        parts.pop();
    }
    let name = parts.join(".");
    is_module_path(&name).then_some(name)
}

/// Drops repeated entries, keeping the first occurrence.
fn dedup(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// The hidden-import list for the freeze step.
///
/// Must run while the compiled modules' sources are still in place.
///
/// # Errors
///
/// Returns an error if a compiled module's source cannot be read.
pub fn resolve_hidden_imports(config: &Config) -> Result<Vec<String>> {
    let mut all = config.freeze.hidden_imports.clone();
    if !config.freeze.auto_hidden_imports {
        return Ok(dedup(all));
    }

    let root = config.project_root();
    let mut names = Vec::new();
    for module in config.compile_modules() {
        let path = root.join(module);
        let bytes =
            std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let imports = scan_imports(&decode_source(&bytes));
        debug!(module = %module.display(), count = imports.len(), "scanned imports");
        all.extend(with_parents(&imports));
        names.extend(module_name(module));
    }
    all.extend(with_parents(&names));

    Ok(dedup(all))
}
