//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill.

use std::io::Write as _;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::CommandRunner;
use crate::domain::CommandError;

/// Shell every step command is handed to.
pub const SHELL: &str = "/bin/sh";

/// Production `CommandRunner`: runs scripts through `/bin/sh -c`.
///
/// Captured commands are bounded by `timeout`; the child is killed when it
/// fires. Streamed commands (zone installation) are unbounded.
pub struct TokioCommandRunner {
    timeout: Duration,
    stdout_to_stderr: bool,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            stdout_to_stderr: false,
        }
    }

    /// Echo streamed stdout on stderr, keeping stdout free for JSON output.
    #[must_use]
    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}

fn shell(script: &str) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c")
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

fn spawn_error(script: &str) -> impl FnOnce(std::io::Error) -> CommandError + '_ {
    move |source| CommandError::Spawn {
        command: script.to_string(),
        source,
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run_shell(&self, script: &str) -> Result<Output, CommandError> {
        debug!(command = %script, "run");
        let mut child = shell(script).spawn().map_err(spawn_error(script))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok::<_, CommandError>(Output {
                    status: status.map_err(spawn_error(script))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                Err(CommandError::TimedOut {
                    command: script.to_string(),
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }

    async fn run_shell_streaming(&self, script: &str) -> Result<Output, CommandError> {
        debug!(command = %script, "run (streaming)");
        let mut child = shell(script).spawn().map_err(spawn_error(script))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        let to_stderr: fn(&str) = |line| {
            let _ = writeln!(std::io::stderr(), "{line}");
        };
        let to_stdout: fn(&str) = |line| {
            let _ = writeln!(std::io::stdout(), "{line}");
        };
        let stdout_echo = if self.stdout_to_stderr { to_stderr } else { to_stdout };

        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            echo_lines(stdout_handle, stdout_echo),
            echo_lines(stderr_handle, to_stderr),
        );
        Ok(Output {
            status: status.map_err(spawn_error(script))?,
            stdout,
            stderr,
        })
    }
}

/// Copy `reader` to the console line by line, returning everything read.
async fn echo_lines<R>(reader: Option<R>, echo: fn(&str)) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let Some(reader) = reader else {
        return captured;
    };
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                echo(String::from_utf8_lossy(&line).trim_end_matches(['\r', '\n']));
                captured.extend_from_slice(&line);
            }
        }
    }
    captured
}
