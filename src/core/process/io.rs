// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output streaming for child processes.
//!
//! ```text
//! spawn_reader(stream)
//!   read 4 KiB chunks
//!   LineDecoder (UTF-8 / ACP / OEM)
//!   each line: FORWARD_TO_LOG --> debug!
//!              KEEP_IN_STRING --> kept
//!              always         --> tail (last TAIL_LINES)
//!   --> StreamCapture { kept, tail }
//! ```

use std::collections::VecDeque;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::builder::{StreamConfig, StreamFlags};
use crate::utility::encoding::LineDecoder;

/// Number of trailing lines retained per stream for failure reports.
pub(super) const TAIL_LINES: usize = 40;

/// Everything a reader task collected from one stream.
#[derive(Debug, Default)]
pub(super) struct StreamCapture {
    kept: Vec<String>,
    tail: VecDeque<String>,
}

impl StreamCapture {
    pub(super) fn push(&mut self, line: String, keep: bool) {
        if self.tail.len() == TAIL_LINES {
            self.tail.pop_front();
        }
        if keep {
            self.tail.push_back(line.clone());
            self.kept.push(line);
        } else {
            self.tail.push_back(line);
        }
    }

    /// Lines kept with `KEEP_IN_STRING`, joined with `\n`.
    pub(super) fn kept(&self) -> String {
        self.kept.join("\n")
    }

    pub(super) fn tail(&self) -> impl Iterator<Item = &str> {
        self.tail.iter().map(String::as_str)
    }
}

/// Spawns a task draining `stream`, or returns `None` when it was not piped.
pub(super) fn spawn_reader<R>(
    stream: Option<R>,
    config: StreamConfig,
    process: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<StreamCapture>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let stream = stream?;
    let process = process.to_string();
    Some(tokio::spawn(async move {
        read_stream(stream, config, &process, stream_name).await
    }))
}

/// Awaits a reader task; a panicked or missing reader yields an empty capture.
pub(super) async fn join_reader(handle: Option<JoinHandle<StreamCapture>>) -> StreamCapture {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => StreamCapture::default(),
    }
}

/// Like [`join_reader`], but gives up after `limit` and aborts the task,
/// keeping nothing from it.
pub(super) async fn join_reader_within(
    handle: Option<JoinHandle<StreamCapture>>,
    limit: Duration,
) -> StreamCapture {
    let Some(mut handle) = handle else {
        return StreamCapture::default();
    };
    match tokio::time::timeout(limit, &mut handle).await {
        Ok(joined) => joined.unwrap_or_default(),
        Err(_) => {
            handle.abort();
            debug!(limit = ?limit, "stream still open after kill, reader aborted");
            StreamCapture::default()
        }
    }
}

async fn read_stream<R>(
    mut reader: R,
    config: StreamConfig,
    process: &str,
    stream_name: &str,
) -> StreamCapture
where
    R: AsyncRead + Unpin,
{
    let forward = config.flags.contains(StreamFlags::FORWARD_TO_LOG);
    let keep = config.flags.contains(StreamFlags::KEEP_IN_STRING);

    let mut decoder = LineDecoder::new(config.encoding);
    let mut capture = StreamCapture::default();
    let mut buf = [0u8; 4096];

    let handle_line = |line: String, capture: &mut StreamCapture| {
        if forward {
            debug!(process = %process, stream = %stream_name, "{line}");
        }
        capture.push(line, keep);
    };

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for line in decoder.push(&buf[..n]) {
                    handle_line(line, &mut capture);
                }
            }
            Err(e) => {
                warn!(process = %process, stream = %stream_name, error = %e, "error reading stream");
                break;
            }
        }
    }

    if let Some(line) = decoder.finish() {
        handle_line(line, &mut capture);
    }

    capture
}
