// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::path::PathBuf;

use super::{MANIFEST_FILE, SourceStash, StashEntry};
use crate::error::{FreezeError, StashError};

fn project() -> (tempfile::TempDir, PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("main.py"), "import bot\n").unwrap();
    fs::write(temp.path().join("bot.py"), "BOT = 1\n").unwrap();
    fs::create_dir_all(temp.path().join("pkg")).unwrap();
    fs::write(temp.path().join("pkg").join("captcha.py"), "CAPTCHA = 1\n").unwrap();
    let stash = temp.path().join(".cyfreeze-stash");
    (temp, stash)
}

fn modules() -> Vec<PathBuf> {
    vec![PathBuf::from("bot.py"), PathBuf::from("pkg/captcha.py")]
}

fn stash_error(err: FreezeError) -> StashError {
    match err {
        FreezeError::Stash(e) => *e,
        other => panic!("expected a stash error, got {other}"),
    }
}

#[test]
fn test_hide_and_restore() {
    let (temp, dir) = project();
    let root = temp.path();

    let stash = SourceStash::hide(root, &dir, &modules(), false).unwrap();
    assert!(!root.join("bot.py").exists());
    assert!(!root.join("pkg/captcha.py").exists());
    assert!(dir.join("bot.py").is_file());
    assert!(dir.join("pkg/captcha.py").is_file());
    assert!(dir.join(MANIFEST_FILE).is_file());
    assert!(root.join("main.py").exists());
    assert_eq!(stash.entries().len(), 2);

    assert_eq!(stash.restore().unwrap(), 2);
    assert_eq!(fs::read_to_string(root.join("bot.py")).unwrap(), "BOT = 1\n");
    assert!(root.join("pkg/captcha.py").is_file());
    assert!(!dir.exists());
}

#[test]
fn test_manifest_lists_moves() {
    let (temp, dir) = project();
    let stash = SourceStash::hide(temp.path(), &dir, &modules(), false).unwrap();

    let text = fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(manifest["version"], 1);
    let entries: Vec<StashEntry> = serde_json::from_value(manifest["entries"].clone()).unwrap();
    assert_eq!(entries, stash.entries());
    drop(stash);
}

#[test]
fn test_drop_restores() {
    let (temp, dir) = project();
    {
        let _stash = SourceStash::hide(temp.path(), &dir, &modules(), false).unwrap();
        assert!(!temp.path().join("bot.py").exists());
    }
    assert!(temp.path().join("bot.py").is_file());
    assert!(temp.path().join("pkg/captcha.py").is_file());
    assert!(!dir.exists());
}

#[test]
fn test_hide_refuses_existing_stash() {
    let (temp, dir) = project();
    fs::create_dir_all(&dir).unwrap();

    let err = SourceStash::hide(temp.path(), &dir, &modules(), false).unwrap_err();
    assert!(matches!(stash_error(err), StashError::AlreadyExists(_)));
    assert!(temp.path().join("bot.py").exists());
}

#[test]
fn test_hide_missing_source_moves_nothing() {
    let (temp, dir) = project();
    let mut modules = modules();
    modules.push(PathBuf::from("solver.py"));

    let err = SourceStash::hide(temp.path(), &dir, &modules, false).unwrap_err();
    assert!(matches!(stash_error(err), StashError::MissingSource(_)));
    assert!(temp.path().join("bot.py").exists());
    assert!(!dir.exists());
}

#[test]
fn test_hide_rejects_escaping_paths() {
    let (temp, dir) = project();
    for module in ["../bot.py", ""] {
        let err = SourceStash::hide(temp.path(), &dir, &[PathBuf::from(module)], false).unwrap_err();
        assert!(matches!(stash_error(err), StashError::OutsideRoot(_)), "{module}");
    }
}

#[cfg(unix)]
#[test]
fn test_failed_hide_rolls_back() {
    use std::os::unix::fs::PermissionsExt;

    let (temp, dir) = project();
    // A read-only package directory makes the second move fail.
    let pkg = temp.path().join("pkg");
    fs::set_permissions(&pkg, fs::Permissions::from_mode(0o555)).unwrap();
    let marker = pkg.join("marker");
    let writable = fs::write(&marker, "").is_ok();
    fs::set_permissions(&pkg, fs::Permissions::from_mode(0o755)).unwrap();
    if writable {
        // Running as root; permissions are not enforced.
        fs::remove_file(&marker).unwrap();
        return;
    }
    fs::set_permissions(&pkg, fs::Permissions::from_mode(0o555)).unwrap();

    let result = SourceStash::hide(temp.path(), &dir, &modules(), false);
    fs::set_permissions(&pkg, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(result.is_err());
    assert!(temp.path().join("bot.py").is_file());
    assert!(temp.path().join("pkg/captcha.py").is_file());
    assert!(!dir.exists());
}

#[test]
fn test_restore_never_overwrites() {
    let (temp, dir) = project();
    let stash = SourceStash::hide(temp.path(), &dir, &modules(), false).unwrap();
    fs::write(temp.path().join("bot.py"), "REGENERATED = 1\n").unwrap();

    let err = stash.restore().unwrap_err();
    assert!(matches!(stash_error(err), StashError::Conflict { .. }));

    assert_eq!(
        fs::read_to_string(temp.path().join("bot.py")).unwrap(),
        "REGENERATED = 1\n"
    );
    assert!(temp.path().join("pkg/captcha.py").is_file());
    assert_eq!(fs::read_to_string(dir.join("bot.py")).unwrap(), "BOT = 1\n");

    let text = fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap();
    assert!(text.contains("bot.py"));
    assert!(!text.contains("captcha.py"));
}

#[test]
fn test_recover_after_crash() {
    let (temp, dir) = project();
    let stash = SourceStash::hide(temp.path(), &dir, &modules(), false).unwrap();
    // Simulates a crash: nothing runs on the way out.
    std::mem::forget(stash);
    assert!(!temp.path().join("bot.py").exists());

    assert_eq!(SourceStash::recover(temp.path(), &dir, false).unwrap(), Some(2));
    assert!(temp.path().join("bot.py").is_file());
    assert!(temp.path().join("pkg/captcha.py").is_file());
    assert!(!dir.exists());

    assert_eq!(SourceStash::recover(temp.path(), &dir, false).unwrap(), None);
}

#[test]
fn test_recover_entry_never_moved() {
    let (temp, dir) = project();
    fs::create_dir_all(&dir).unwrap();
    // Manifest written, crash before the move.
    let manifest = serde_json::json!({
        "version": 1,
        "root": temp.path(),
        "entries": [{ "original": "bot.py", "stashed": "bot.py" }],
    });
    fs::write(dir.join(MANIFEST_FILE), manifest.to_string()).unwrap();

    assert_eq!(SourceStash::recover(temp.path(), &dir, false).unwrap(), Some(0));
    assert!(temp.path().join("bot.py").is_file());
    assert!(!dir.exists());
}

#[test]
fn test_recover_rejects_bad_manifest() {
    let (temp, dir) = project();
    fs::create_dir_all(&dir).unwrap();
    let err = SourceStash::recover(temp.path(), &dir, false).unwrap_err();
    assert!(matches!(stash_error(err), StashError::Manifest { .. }));

    fs::write(
        dir.join(MANIFEST_FILE),
        r#"{"version":1,"root":"/","entries":[{"original":"../etc/passwd","stashed":"x"}]}"#,
    )
    .unwrap();
    let err = SourceStash::recover(temp.path(), &dir, false).unwrap_err();
    assert!(matches!(stash_error(err), StashError::OutsideRoot(_)));

    fs::write(dir.join(MANIFEST_FILE), r#"{"version":9,"root":"/","entries":[]}"#).unwrap();
    let err = SourceStash::recover(temp.path(), &dir, false).unwrap_err();
    insta::assert_snapshot!(
        err.to_string().replace(&dir.display().to_string(), "<stash>").replace('\\', "/"),
        @"stash error: invalid stash manifest '<stash>/manifest.json': unsupported version 9"
    );
}

#[test]
fn test_dry_run_touches_nothing() {
    let (temp, dir) = project();
    let stash = SourceStash::hide(temp.path(), &dir, &modules(), true).unwrap();
    assert!(temp.path().join("bot.py").is_file());
    assert!(!dir.exists());
    assert_eq!(stash.entries().len(), 2);
    assert_eq!(stash.restore().unwrap(), 2);
    assert!(temp.path().join("bot.py").is_file());
}
