//! OS process launcher.
//!
//! Provides [`run_command`], which spawns a [`CommandSpec`], captures stdout
//! and stderr separately, and waits for exit. There is no timeout: a script
//! that never exits keeps its caller waiting.

use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::executor::{CommandSpec, ProcessLauncher, ProcessOutput, ScriptError};

/// Maximum stdout or stderr size captured per stream (10 MiB).
///
/// Bytes past this limit are read and discarded so the child still runs to
/// completion and reports its real exit code.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Launches real child processes that inherit the service environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    async fn launch(&self, spec: &CommandSpec) -> Result<ProcessOutput, ScriptError> {
        run_command(spec).await
    }
}

/// Spawn the process described by `spec` and capture its output.
///
/// The child inherits the host environment with `spec.env` layered on top.
/// Stdin is closed.
pub async fn run_command(spec: &CommandSpec) -> Result<ProcessOutput, ScriptError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ScriptError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    // Drain both pipes concurrently so a chatty stderr cannot block stdout.
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    let status = child.wait().await.map_err(ScriptError::IoError)?;

    let stdout_bytes = stdout_task.await.unwrap_or_default();
    let stderr_bytes = stderr_task.await.unwrap_or_default();

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
        exit_code: status.code().unwrap_or(-1),
    })
}

/// Read an entire output stream, keeping the first [`MAX_OUTPUT_BYTES`].
///
/// The pipe stays open until EOF; closing it early would kill a verbose
/// child with SIGPIPE.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
