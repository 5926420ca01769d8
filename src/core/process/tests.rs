// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::builder::{ProcessBuilder, ProcessFlags};
use super::io::{StreamCapture, TAIL_LINES};
use crate::error::ProcessError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[cfg(unix)]
fn sh(script: &str) -> ProcessBuilder {
    ProcessBuilder::new("/bin/sh").arg("-c").arg(script)
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("python3")
        .args(["-m", "PyInstaller", "--name", "my bot", "main.py"])
        .arg("");
    insta::assert_snapshot!(builder.command_line(), @r#"python3 -m PyInstaller --name "my bot" main.py """#);
}

#[test]
fn test_display_name() {
    assert_eq!(ProcessBuilder::new("/usr/bin/python3").display_name(), "python3");
    assert_eq!(
        ProcessBuilder::new("python3").name("pyinstaller").display_name(),
        "pyinstaller"
    );
}

#[test]
fn test_env_vars_accumulate() {
    let builder = ProcessBuilder::new("python3")
        .env("PYTHONIOENCODING", "utf-8")
        .env("PYTHONDONTWRITEBYTECODE", "1");
    let keys: Vec<&str> = builder.env_vars().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["PYTHONDONTWRITEBYTECODE", "PYTHONIOENCODING"]);
}

#[test]
fn test_capture_tail_keeps_last_lines() {
    let mut capture = StreamCapture::default();
    for i in 0..(TAIL_LINES + 5) {
        capture.push(format!("line {i}"), false);
    }
    let tail: Vec<&str> = capture.tail().collect();
    assert_eq!(tail.len(), TAIL_LINES);
    assert_eq!(tail.first().copied(), Some("line 5"));
    assert_eq!(capture.kept(), "");
}

#[test]
fn test_capture_kept_lines_are_joined() {
    let mut capture = StreamCapture::default();
    capture.push("a".to_string(), true);
    capture.push("b".to_string(), true);
    assert_eq!(capture.kept(), "a\nb");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .capture_output()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout(), @"hello");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_exit_code_allowed() {
    let output = sh("exit 42")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .run()
        .await
        .expect("process should complete");

    assert_eq!(output.exit_code(), 42);
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_success_codes() {
    let output = sh("exit 2")
        .success_codes([0, 2])
        .run()
        .await
        .expect("2 is a success code");
    assert_eq!(output.exit_code(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_non_zero_exit_is_error() {
    let err = sh("echo boom >&2; exit 3")
        .name("cython")
        .run()
        .await
        .expect_err("exit 3 should fail");

    insta::assert_snapshot!(err.to_string(), @"cython exited with code 3");
    assert!(matches!(
        err.downcast_ref::<ProcessError>(),
        Some(ProcessError::NonZeroExit { code: 3, .. })
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_env() {
    let output = sh("echo $CYFREEZE_TEST_VAR")
        .env("CYFREEZE_TEST_VAR", "test_value")
        .capture_stdout()
        .run()
        .await
        .expect("process should succeed");

    insta::assert_snapshot!(output.stdout(), @"test_value");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_cwd() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("marker.txt"), "").unwrap();

    let output = ProcessBuilder::new("ls")
        .cwd(temp.path())
        .capture_stdout()
        .run()
        .await
        .expect("ls should succeed");

    assert_eq!(output.stdout(), "marker.txt");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_cancelled_before_spawn() {
    let token = CancellationToken::new();
    token.cancel();

    let output = ProcessBuilder::new("/nonexistent/never-spawned")
        .run_with_cancellation(token)
        .await
        .expect("cancelled run is not an error");
    assert!(output.is_interrupted());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_cancelled_while_running() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let output = ProcessBuilder::new("sleep")
        .arg("30")
        .flag(ProcessFlags::TERMINATE_ON_INTERRUPT)
        .run_with_cancellation(token)
        .await
        .expect("interrupted run is not an error");

    assert!(output.is_interrupted());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_timeout_fails() {
    let err = ProcessBuilder::new("sleep")
        .arg("30")
        .timeout(Duration::from_millis(100))
        .run()
        .await
        .expect_err("timed-out process should fail");

    assert!(matches!(
        err.downcast_ref::<ProcessError>(),
        Some(ProcessError::TimedOut { .. })
    ));
    insta::assert_snapshot!(err.to_string(), @"sleep timed out after 0s");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_timeout_with_pipe_holding_grandchild() {
    let started = std::time::Instant::now();
    let err = sh("sleep 8 & sleep 30")
        .timeout(Duration::from_millis(200))
        .run()
        .await
        .expect_err("timed-out process should fail");

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(matches!(
        err.downcast_ref::<ProcessError>(),
        Some(ProcessError::TimedOut { .. })
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_exit_with_pipe_holding_grandchild() {
    let started = std::time::Instant::now();
    let output = sh("sleep 30 & echo done")
        .capture_stdout()
        .timeout(Duration::from_millis(200))
        .run()
        .await
        .unwrap();

    assert_eq!(output.exit_code(), 0);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_cancel_with_pipe_holding_grandchild() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let output = sh("sleep 8 & sleep 30")
        .flag(ProcessFlags::TERMINATE_ON_INTERRUPT)
        .run_with_cancellation(token)
        .await
        .expect("interrupted run is not an error");

    assert!(output.is_interrupted());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_process_missing_executable() {
    let err = ProcessBuilder::new("nonexistent_program_12345")
        .run()
        .await
        .expect_err("missing program should fail");

    assert!(matches!(
        err.downcast_ref::<ProcessError>(),
        Some(ProcessError::ExecutableNotFound { .. })
    ));
}

#[cfg(unix)]
#[test]
fn test_executable_lookup_found() {
    let builder = ProcessBuilder::which("sh").expect("sh should be in PATH");
    assert!(builder.program().exists());
    assert!(ProcessBuilder::exists("sh"));
    assert_eq!(ProcessBuilder::find("sh").as_ref(), Some(builder.program()));
}

#[test]
fn test_executable_lookup_not_found() {
    let program = "nonexistent_program_12345";

    let err = ProcessBuilder::which(program).expect_err("should not be found");
    assert!(err.to_string().contains(program));
    assert!(!ProcessBuilder::exists(program));
    assert!(ProcessBuilder::find(program).is_none());
}
