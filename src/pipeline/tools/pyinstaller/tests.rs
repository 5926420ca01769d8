// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::PyInstallerTool;
use crate::pipeline::tools::Tool;
use crate::pipeline::tools::python::PythonInterpreter;
use crate::pipeline::tools::test_utils::{dry_context, project_config, run_with_logs};

fn tool(root: &std::path::Path, body: &str, hidden: &[&str]) -> PyInstallerTool {
    let config = project_config(root, body);
    PyInstallerTool::from_config(
        PythonInterpreter::new("python3"),
        &config,
        hidden.iter().map(ToString::to_string).collect(),
    )
}

#[test]
fn test_default_args() {
    let temp = tempfile::tempdir().unwrap();
    let tool = tool(temp.path(), "", &[]);

    insta::assert_snapshot!(
        tool.args(temp.path()).join(" "),
        @"-m PyInstaller --noconfirm --clean --onefile --name main --distpath dist --workpath build --specpath . main.py"
    );
}

#[test]
fn test_full_args() {
    let temp = tempfile::tempdir().unwrap();
    let body = r#"name = "bot"

[freeze]
onefile = false
console = false
clean_cache = false
icon = "assets/bot.ico"
collect_all = ["selenium"]
extra_args = ["--log-level", "WARN"]
data = [{ source = "assets", dest = "assets" }]
"#;
    let tool = tool(temp.path(), body, &["requests", "yaml"]);
    let args = tool.args(temp.path()).join(" ");

    let expected = format!(
        "-m PyInstaller --noconfirm --onedir --noconsole --name bot --distpath dist --workpath build \
         --specpath . --icon {icon} --hidden-import requests --hidden-import yaml --collect-all selenium \
         --add-data assets{sep}assets --log-level WARN main.py",
        icon = std::path::Path::new("assets").join("bot.ico").display(),
        sep = super::ADD_DATA_SEPARATOR,
    );
    assert_eq!(args, expected);
}

#[test]
fn test_expected_output() {
    let temp = tempfile::tempdir().unwrap();
    let onefile = tool(temp.path(), "name = \"bot\"\n", &[]);
    let expected = temp
        .path()
        .join("dist")
        .join(format!("bot{}", std::env::consts::EXE_SUFFIX));
    assert_eq!(onefile.expected_output(), std::path::absolute(expected).unwrap());

    let onedir = tool(temp.path(), "name = \"bot\"\n[freeze]\nonefile = false\n", &[]);
    assert_eq!(
        onedir.expected_output(),
        std::path::absolute(temp.path().join("dist").join("bot")).unwrap()
    );
}

#[tokio::test]
async fn test_pyinstaller_dry_run() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = dry_context(project_config(temp.path(), ""));
    let tool = PyInstallerTool::from_config(
        PythonInterpreter::new("python3"),
        ctx.config(),
        vec!["captcha".to_string()],
    );
    assert_eq!(tool.name(), "pyinstaller");
    assert_eq!(tool.hidden_imports(), ["captcha"]);

    let ((), logs) = run_with_logs(|| tool.run(&ctx)).await.unwrap();
    assert!(logs.contains("freezing name=main hidden_imports=1"));
    assert!(logs.contains("--hidden-import captcha main.py"));
}
