use std::collections::VecDeque;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::gcloud::{GCLOUD, GcloudError};

/// Lines of a streamed command's stderr kept for the error report.
const STDERR_TAIL_LINES: usize = 40;

/// Runs gcloud with a structured argv; no shell is involved.
///
/// [`RealExecutor`] spawns the CLI. Tests substitute a mockall mock.
#[allow(async_fn_in_trait)]
pub trait GcloudExecutor: Send + Sync {
    /// Run to completion and return stdout.
    async fn exec(&self, args: &[String]) -> Result<String, GcloudError>;

    /// Run with stdout and stderr shown live. Long-running commands such as
    /// `run deploy` use this so Cloud Build progress reaches the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), GcloudError>;

    /// Run with `stdin_data` piped in and return stdout.
    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, GcloudError>;
}

/// Executor backed by the installed gcloud CLI.
pub struct RealExecutor;

impl GcloudExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, GcloudError> {
        tracing::debug!(?args, "gcloud");

        let output = gcloud(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(GcloudError::spawn)?;

        captured(args, output)
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), GcloudError> {
        tracing::debug!(?args, "gcloud (streaming)");

        let mut child = gcloud(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(GcloudError::spawn)?;

        // Forward stderr line by line and keep its tail for the error.
        let mut tail = StderrTail::default();
        if let Some(stderr) = child.stderr.take() {
            let mut lines = BufReader::new(stderr).split(b'\n');
            while let Some(line) = lines
                .next_segment()
                .await
                .map_err(|e| GcloudError::Io { source: e })?
            {
                let line = String::from_utf8_lossy(&line).into_owned();
                eprintln!("{line}");
                tail.push(line);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| GcloudError::Io { source: e })?;

        if status.success() {
            Ok(())
        } else {
            Err(GcloudError::CommandFailed {
                args: args.to_vec(),
                stderr: tail.into_report(status),
            })
        }
    }

    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, GcloudError> {
        tracing::debug!(?args, bytes = stdin_data.len(), "gcloud (stdin)");

        let mut child = gcloud(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(GcloudError::spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(stdin_data)
                .await
                .map_err(|e| GcloudError::Io { source: e })?;
            stdin
                .shutdown()
                .await
                .map_err(|e| GcloudError::Io { source: e })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GcloudError::Io { source: e })?;

        captured(args, output)
    }
}

fn gcloud(args: &[String]) -> Command {
    let mut cmd = Command::new(GCLOUD);
    cmd.args(args);
    cmd
}

/// Stdout of a finished command, or its stderr as a [`GcloudError::CommandFailed`].
fn captured(args: &[String], output: std::process::Output) -> Result<String, GcloudError> {
    if output.status.success() {
        return String::from_utf8(output.stdout).map_err(|e| GcloudError::InvalidUtf8 { source: e });
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
    Err(GcloudError::CommandFailed {
        args: args.to_vec(),
        stderr: if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        },
    })
}

/// The last [`STDERR_TAIL_LINES`] non-empty stderr lines of a streamed command.
#[derive(Debug, Default)]
struct StderrTail {
    lines: VecDeque<String>,
}

impl StderrTail {
    fn push(&mut self, line: String) {
        // gcloud redraws progress spinners with carriage returns
        let line = match line.rsplit('\r').find(|part| !part.trim().is_empty()) {
            Some(last) => last.trim_end().to_owned(),
            None => return,
        };
        if self.lines.len() == STDERR_TAIL_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    fn into_report(self, status: ExitStatus) -> String {
        if self.lines.is_empty() {
            return format!("exited with {status}");
        }
        Vec::from(self.lines).join("\n")
    }
}
