// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for source hiding.
//!
//! Hides real files in a temporary project and checks they always come back.

use std::fs;
use std::path::PathBuf;

use cyfreeze::pipeline::stash::{MANIFEST_FILE, SourceStash};

fn project() -> (tempfile::TempDir, Vec<PathBuf>) {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("bot.py"), "def run():\n    pass\n").unwrap();
    fs::create_dir_all(temp.path().join("solvers")).unwrap();
    fs::write(temp.path().join("solvers/captcha.py"), "import re\n").unwrap();
    let modules = vec![PathBuf::from("bot.py"), PathBuf::from("solvers/captcha.py")];
    (temp, modules)
}

#[test]
fn stash_hides_and_restores_nested_sources() {
    let (temp, modules) = project();
    let root = temp.path();
    let dir = root.join(".cyfreeze-stash");

    let stash = SourceStash::hide(root, &dir, &modules, false).unwrap();
    assert_eq!(stash.entries().len(), 2);
    assert!(!root.join("bot.py").exists());
    assert!(!root.join("solvers/captcha.py").exists());
    assert!(dir.join(MANIFEST_FILE).is_file());

    assert_eq!(stash.restore().unwrap(), 2);
    assert_eq!(
        fs::read_to_string(root.join("bot.py")).unwrap(),
        "def run():\n    pass\n"
    );
    assert!(root.join("solvers/captcha.py").is_file());
    assert!(!dir.exists());
}

#[test]
fn stash_recovers_after_a_crash() {
    let (temp, modules) = project();
    let root = temp.path();
    let dir = root.join(".cyfreeze-stash");

    // A process killed mid-build never runs Drop.
    std::mem::forget(SourceStash::hide(root, &dir, &modules, false).unwrap());
    assert!(!root.join("bot.py").exists());

    assert_eq!(SourceStash::recover(root, &dir, false).unwrap(), Some(2));
    assert!(root.join("bot.py").is_file());
    assert!(root.join("solvers/captcha.py").is_file());
    assert_eq!(SourceStash::recover(root, &dir, false).unwrap(), None);
}

#[test]
fn stash_restore_keeps_conflicting_copy() {
    let (temp, modules) = project();
    let root = temp.path();
    let dir = root.join(".cyfreeze-stash");

    std::mem::forget(SourceStash::hide(root, &dir, &modules, false).unwrap());
    fs::write(root.join("bot.py"), "edited meanwhile\n").unwrap();

    let err = SourceStash::recover(root, &dir, false).unwrap_err();
    assert!(err.to_string().contains("bot.py"));
    assert_eq!(
        fs::read_to_string(root.join("bot.py")).unwrap(),
        "edited meanwhile\n"
    );
    assert!(root.join("solvers/captcha.py").is_file());
    // The manifest still points at the hidden copy.
    assert!(dir.join(MANIFEST_FILE).is_file());
}
