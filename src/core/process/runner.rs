// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, cwd, env, stdio
//!              |
//!              v
//!          spawn()  --NotFound--> ExecutableNotFound
//!              |
//!      wait | cancel | timeout
//!              |
//!              v
//!   drain readers (bounded by READER_DRAIN after a kill)
//!              |
//!              v
//!    timed out --> TimedOut
//!    validate exit_code
//!    (skip if ALLOW_FAILURE or interrupted)
//!    failure: log stream tails at error level
//!              |
//!              v
//!       ProcessOutput
//! ```

use crate::error::{ProcessError, Result};
use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use super::io::{StreamCapture, join_reader, join_reader_within, spawn_reader};

/// How long a cancelled child may take to exit on its own interrupt.
const INTERRUPT_GRACE: Duration = Duration::from_secs(2);

/// How long the readers may keep draining after the child was killed.
/// Grandchildren that inherited the pipes can hold them open indefinitely.
const READER_DRAIN: Duration = Duration::from_millis(500);

/// How a wait ended.
enum WaitOutcome {
    Exited(ExitStatus),
    Interrupted(ExitStatus),
    TimedOut,
}

impl ProcessBuilder {
    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable cannot be spawned or exits with a
    /// code outside the success set (unless `ALLOW_FAILURE` is set).
    pub async fn run(self) -> Result<ProcessOutput> {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// When the token fires the child is killed, after a short grace period
    /// unless `TERMINATE_ON_INTERRUPT` is set, and the returned output has
    /// `is_interrupted() == true`. An interrupted run is never an exit-code
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable cannot be spawned, waiting on it
    /// fails, it outlives its timeout, or it exits with a code outside the
    /// success set (unless `ALLOW_FAILURE` is set).
    ///
    /// # Example
    ///
    /// ```ignore
    /// use tokio_util::sync::CancellationToken;
    /// use cyfreeze::core::process::builder::ProcessBuilder;
    ///
    /// let token = CancellationToken::new();
    /// let output = ProcessBuilder::new("python3")
    ///     .args(["-m", "PyInstaller", "--version"])
    ///     .capture_stdout()
    ///     .run_with_cancellation(token)
    ///     .await?;
    /// ```
    pub async fn run_with_cancellation(self, token: CancellationToken) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Ok(ProcessOutput::new(-1, String::new(), String::new(), true));
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child = self.build_command().spawn().map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ProcessError::ExecutableNotFound {
                    name: self.program().display().to_string(),
                }
            } else {
                ProcessError::SpawnFailed {
                    command: cmd_line.clone(),
                    source,
                }
            }
        })?;
        let started = Instant::now();
        trace!(process = %name, pid = ?child.id(), "spawned");

        let stdout = spawn_reader(child.stdout.take(), self.stdout_config(), &name, "stdout");
        let stderr = spawn_reader(child.stderr.take(), self.stderr_config(), &name, "stderr");

        let outcome = self.wait(&name, &mut child, &token).await?;

        // The timeout also bounds the drain after a clean exit.
        let drain = match (&outcome, self.timeout_duration()) {
            (WaitOutcome::Exited(_), None) => None,
            (WaitOutcome::Exited(_), Some(limit)) => {
                Some(limit.saturating_sub(started.elapsed()).max(READER_DRAIN))
            }
            _ => Some(READER_DRAIN),
        };
        let (stdout, stderr) = match drain {
            None => (join_reader(stdout).await, join_reader(stderr).await),
            Some(limit) => (
                join_reader_within(stdout, limit).await,
                join_reader_within(stderr, limit).await,
            ),
        };

        let (status, interrupted) = match outcome {
            WaitOutcome::Exited(status) => (status, false),
            WaitOutcome::Interrupted(status) => (status, true),
            WaitOutcome::TimedOut => {
                log_tail(&name, "stdout", &stdout);
                log_tail(&name, "stderr", &stderr);
                return Err(ProcessError::TimedOut {
                    name,
                    after: self.timeout_duration().unwrap_or_default(),
                }
                .into());
            }
        };
        let exit_code = status.code().unwrap_or(-1);

        if !interrupted
            && !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE)
            && !self.success_code_set().contains(&exit_code)
        {
            log_tail(&name, "stdout", &stdout);
            log_tail(&name, "stderr", &stderr);
            return Err(ProcessError::NonZeroExit {
                name,
                code: exit_code,
            }
            .into());
        }

        trace!(process = %name, exit_code, interrupted, "completed");
        Ok(ProcessOutput::new(
            exit_code,
            stdout.kept(),
            stderr.kept(),
            interrupted,
        ))
    }

    async fn wait(
        &self,
        name: &str,
        child: &mut Child,
        token: &CancellationToken,
    ) -> Result<WaitOutcome> {
        let timeout = async {
            match self.timeout_duration() {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            status = child.wait() => Ok(WaitOutcome::Exited(status?)),
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, terminating process");
                let graceful = !self.process_flags().contains(ProcessFlags::TERMINATE_ON_INTERRUPT);
                Ok(WaitOutcome::Interrupted(terminate(child, graceful).await?))
            }
            () = timeout => {
                warn!(process = %name, timeout = ?self.timeout_duration(), "process timed out");
                terminate(child, false).await?;
                Ok(WaitOutcome::TimedOut)
            }
        }
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.arguments());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        command.envs(self.env_vars());

        command.stdin(Stdio::null());
        // Always piped: forwarded to the log, captured, or both.
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        command.kill_on_drop(true);

        command
    }
}

/// Stops a child. With `graceful`, a terminal Ctrl+C has already reached the
/// child through the shared process group, so it gets a moment to exit.
async fn terminate(child: &mut Child, graceful: bool) -> Result<ExitStatus> {
    if graceful
        && let Ok(status) = tokio::time::timeout(INTERRUPT_GRACE, child.wait()).await
    {
        return Ok(status?);
    }
    if let Err(e) = child.kill().await {
        debug!(error = %e, "kill failed, process may have exited");
    }
    Ok(child.wait().await?)
}

fn log_tail(name: &str, stream: &str, capture: &StreamCapture) {
    for line in capture.tail() {
        error!(process = %name, stream = %stream, "{line}");
    }
}
