// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{PythonInterpreter, PythonVersion, parse_version, venv_python};
use crate::error::ToolchainError;
use crate::pipeline::tools::test_utils::{dry_context, project_config, run_with_logs};

#[test]
fn test_parse_version() {
    assert_eq!(
        parse_version("Python 3.12.4"),
        Some(PythonVersion {
            major: 3,
            minor: 12,
            patch: Some(4)
        })
    );
    assert_eq!(
        parse_version("\nPython 2.7\n").map(|v| v.to_string()),
        Some("2.7".to_string())
    );
    assert_eq!(parse_version("python: command not found"), None);
}

#[test]
fn test_version_ordering() {
    let old = parse_version("Python 3.8.10").unwrap();
    let new = parse_version("Python 3.11.0").unwrap();
    assert!(old < new);
}

#[test]
fn test_resolve_explicit_missing_path() {
    let temp = tempfile::tempdir().unwrap();
    let config = project_config(temp.path(), "\n[tools]\npython = \"env/bin/python\"\n");

    let err = PythonInterpreter::resolve_with(&config, None).unwrap_err();
    assert!(matches!(err, ToolchainError::InterpreterNotFound { .. }));
    assert!(err.to_string().contains("python"));
}

#[test]
fn test_resolve_explicit_existing_path() {
    let temp = tempfile::tempdir().unwrap();
    let python = temp.path().join("env").join("python");
    std::fs::create_dir_all(python.parent().unwrap()).unwrap();
    std::fs::write(&python, "").unwrap();

    let config = project_config(temp.path(), "\n[tools]\npython = \"env/python\"\n");
    let resolved = PythonInterpreter::resolve_with(&config, None).unwrap();
    assert_eq!(resolved.program(), python);
}

#[test]
fn test_resolve_prefers_active_virtualenv() {
    let temp = tempfile::tempdir().unwrap();
    let active = temp.path().join("active");
    let local = temp.path().join("project").join(".venv");
    for venv in [&active, &local] {
        let python = venv_python(venv);
        std::fs::create_dir_all(python.parent().unwrap()).unwrap();
        std::fs::write(&python, "").unwrap();
    }

    let config = project_config(&temp.path().join("project"), "");

    let resolved = PythonInterpreter::resolve_with(&config, Some(&active)).unwrap();
    assert_eq!(resolved.program(), venv_python(&active));

    let resolved = PythonInterpreter::resolve_with(&config, None).unwrap();
    assert_eq!(resolved.program(), venv_python(&local));
}

#[test]
fn test_command_line() {
    let python = PythonInterpreter::new("python3");
    let builder = python.command("pip").args(["-m", "pip", "--version"]);
    insta::assert_snapshot!(builder.command_line(), @"python3 -m pip --version");
    assert_eq!(builder.display_name(), "pip");
}

#[tokio::test]
async fn test_missing_modules_dry_run() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = dry_context(project_config(temp.path(), ""));
    let python = PythonInterpreter::new("python3");

    let (missing, logs) = run_with_logs(|| async {
        python
            .missing_modules(&ctx, &["Cython".to_string(), "PyInstaller".to_string()])
            .await
    })
    .await
    .unwrap();

    assert!(missing.is_empty());
    assert!(logs.contains("[dry-run] would run"));
    assert!(logs.contains("Cython PyInstaller"));
}

#[tokio::test]
async fn test_missing_modules_empty_list_runs_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = dry_context(project_config(temp.path(), ""));
    let python = PythonInterpreter::new("python3");

    let (missing, logs) = run_with_logs(|| async { python.missing_modules(&ctx, &[]).await })
        .await
        .unwrap();
    assert!(missing.is_empty());
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_version_dry_run() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = dry_context(project_config(temp.path(), ""));
    let python = PythonInterpreter::new("python3");

    let version = python.version(&ctx).await.unwrap();
    assert_eq!(version, None);
}
