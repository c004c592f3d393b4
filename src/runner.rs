//! Asynchronous shell command execution.
//!
//! One call, one run: a command line is handed to the shell, an optional
//! payload is streamed to its standard input, and the captured output plus
//! exit status come back as a single result. The runner holds no state
//! between invocations.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Captured output of one completed run.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    /// Everything the command wrote to standard output.
    pub stdout: Vec<u8>,
    /// Everything the command wrote to standard error.
    pub stderr: Vec<u8>,
    /// Exit code of the command (`-1` if it was killed by a signal).
    pub status: i32,
}

/// How command lines are executed: the shell binary and optional working
/// directory.
#[derive(Debug, Clone)]
pub struct Shell {
    program: String,
    cwd: Option<PathBuf>,
}

impl Shell {
    /// Use the given shell binary.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cwd: None,
        }
    }

    /// Set the working directory for launched commands.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    fn command(&self, command_line: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-c").arg(command_line);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new("sh")
    }
}

/// Run a command line, capturing stdout, stderr, and the exit status.
///
/// With a payload, the child's standard input is piped: the payload is
/// written in full, then the stream is shut down so the child sees EOF.
/// Without one, standard input is `/dev/null`. Both output pipes are read to
/// exhaustion before the exit status is collected; the result carries all
/// three together.
pub async fn run(shell: &Shell, command_line: &str, stdin_payload: Option<&[u8]>) -> Result<RunOutput> {
    debug!(command = %command_line, stdin = stdin_payload.is_some(), "spawning command");

    let mut cmd = shell.command(command_line);
    cmd.stdin(if stdin_payload.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| Error::Spawn {
        command: command_line.to_string(),
        source,
    })?;

    feed_stdin(&mut child, command_line, stdin_payload).await?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let (stdout, stderr) = tokio::join!(drain(stdout_pipe), drain(stderr_pipe));
    let stdout = stdout.map_err(|source| Error::PipeRead {
        command: command_line.to_string(),
        stream: "stdout",
        source,
    })?;
    let stderr = stderr.map_err(|source| Error::PipeRead {
        command: command_line.to_string(),
        stream: "stderr",
        source,
    })?;

    let status = wait(&mut child, command_line).await?;
    trace!(
        command = %command_line,
        status,
        stdout_len = stdout.len(),
        stderr_len = stderr.len(),
        "command completed"
    );

    Ok(RunOutput {
        stdout,
        stderr,
        status,
    })
}

/// Run a command line with stdout and stderr inherited from this process.
///
/// Used for result commands, whose output belongs to the user rather than to
/// the engine; only the exit status is collected.
pub async fn run_passthrough(
    shell: &Shell,
    command_line: &str,
    stdin_payload: Option<&[u8]>,
) -> Result<i32> {
    debug!(command = %command_line, stdin = stdin_payload.is_some(), "spawning passthrough command");

    let mut cmd = shell.command(command_line);
    cmd.stdin(if stdin_payload.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|source| Error::Spawn {
        command: command_line.to_string(),
        source,
    })?;

    feed_stdin(&mut child, command_line, stdin_payload).await?;

    wait(&mut child, command_line).await
}

/// Write the payload to the child's stdin and close the stream.
///
/// Payloads are input- or line-sized, well under pipe capacity, so the write
/// completes before the child's output needs draining.
async fn feed_stdin(
    child: &mut tokio::process::Child,
    command_line: &str,
    stdin_payload: Option<&[u8]>,
) -> Result<()> {
    let Some(payload) = stdin_payload else {
        return Ok(());
    };
    let Some(mut stdin) = child.stdin.take() else {
        return Ok(());
    };
    stdin
        .write_all(payload)
        .await
        .map_err(|source| Error::StdinWrite {
            command: command_line.to_string(),
            source,
        })?;
    stdin
        .shutdown()
        .await
        .map_err(|source| Error::StdinClose {
            command: command_line.to_string(),
            source,
        })?;
    Ok(())
}

async fn drain(pipe: Option<impl AsyncRead + Unpin>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn wait(child: &mut tokio::process::Child, command_line: &str) -> Result<i32> {
    let status = child.wait().await.map_err(|source| Error::Wait {
        command: command_line.to_string(),
        source,
    })?;
    Ok(status.code().unwrap_or(-1))
}
