// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::PipTool;
use crate::pipeline::tools::Tool;
use crate::pipeline::tools::python::PythonInterpreter;
use crate::pipeline::tools::test_utils::{dry_context, project_config, run_with_logs};

#[test]
fn test_pip_package_args() {
    let tool = PipTool::packages(PythonInterpreter::new("python3"), ["pyinstaller", "cython"]);
    insta::assert_snapshot!(
        tool.args().join(" "),
        @"-m pip install --disable-pip-version-check pyinstaller cython"
    );
    assert_eq!(tool.name(), "pip");
}

#[test]
fn test_pip_requirements_args() {
    let tool = PipTool::requirements(PythonInterpreter::new("python3"), "requirements.txt");
    insta::assert_snapshot!(
        tool.args().join(" "),
        @"-m pip install --disable-pip-version-check -r requirements.txt"
    );
}

#[tokio::test]
async fn test_pip_dry_run() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = dry_context(project_config(temp.path(), ""));
    let tool = PipTool::packages(PythonInterpreter::new("python3"), ["pyinstaller"]);

    let ((), logs) = run_with_logs(|| tool.run(&ctx)).await.unwrap();
    assert!(logs.contains("installing packages=pyinstaller"));
    assert!(logs.contains(
        "[dry-run] would run cmd=python3 -m pip install --disable-pip-version-check pyinstaller"
    ));
}

#[tokio::test]
async fn test_pip_nothing_to_install() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = dry_context(project_config(temp.path(), ""));
    let tool = PipTool::packages(PythonInterpreter::new("python3"), Vec::<String>::new());

    let ((), logs) = run_with_logs(|| tool.run(&ctx)).await.unwrap();
    assert!(logs.is_empty());
}
