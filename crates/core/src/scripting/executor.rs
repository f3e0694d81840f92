//! Execution request types and the process launcher interface.
//!
//! Defines [`ExecuteRequest`] (what the caller asks for), [`CommandSpec`]
//! (the fully resolved process invocation), [`ProcessOutput`], and the
//! [`ProcessLauncher`] trait the runner drives.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Backoff applied between attempts when the request leaves it at zero.
pub const DEFAULT_BACKOFF_MS: i64 = 500;

/// A request to execute a script, as posted by the dashboard.
///
/// Every field is optional in JSON. Call [`ExecuteRequest::normalized`] before
/// running to apply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecuteRequest {
    /// Arguments appended after the script path.
    pub args: Vec<String>,
    /// Extra environment variables; these override config and host values.
    pub env: BTreeMap<String, String>,
    /// Interpreter command. Blank means "look up by extension".
    pub command: String,
    /// Milliseconds to wait between attempts and between repeats.
    pub backoff: i64,
    /// Number of independent sequential executions.
    pub repeat: i64,
    /// Additional attempts per execution after a failure.
    pub retry: i64,
}

impl ExecuteRequest {
    /// Apply defaults: backoff 500ms when unset, at least one repeat, and a
    /// non-negative retry count.
    pub fn normalized(mut self) -> Self {
        if self.backoff <= 0 {
            self.backoff = DEFAULT_BACKOFF_MS;
        }
        if self.repeat <= 0 {
            self.repeat = 1;
        }
        self.retry = self.retry.max(0);
        self.command = self.command.trim().to_string();
        self
    }
}

/// A fully resolved process invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    /// Program to spawn (first word of the command line).
    pub program: String,
    /// Fixed command arguments, then the script path, then user arguments.
    pub args: Vec<String>,
    /// Variables set on top of the inherited host environment.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Build the invocation for `script_path`.
    ///
    /// `command_line` is split on whitespace: the first word is the program,
    /// the rest are fixed arguments placed before the script path (so
    /// `"go run"` runs `go run <script> <args...>`).
    pub fn resolve(
        command_line: &str,
        script_path: &str,
        user_args: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<Self, ScriptError> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(ScriptError::EmptyCommand)?;

        let mut args: Vec<String> = words.collect();
        args.push(script_path.to_string());
        args.extend(user_args.iter().cloned());

        Ok(Self {
            program,
            args,
            env: env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }
}

/// Captured result of one process run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code (`-1` if terminated by a signal).
    pub exit_code: i32,
}

impl ProcessOutput {
    /// Stdout followed by stderr, not interleaved.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Errors that can occur while preparing or spawning a script process.
#[derive(Debug)]
pub enum ScriptError {
    /// No interpreter command could be resolved for the script.
    EmptyCommand,
    /// The process could not be started (program missing, permissions, ...).
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// An I/O error occurred while waiting on the process.
    IoError(std::io::Error),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "No command configured for script"),
            Self::Spawn { program, source } => {
                write!(f, "Failed to start '{program}': {source}")
            }
            Self::IoError(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::IoError(err) => Some(err),
            Self::EmptyCommand => None,
        }
    }
}

/// Something that can run a [`CommandSpec`] to completion.
///
/// The production implementation spawns OS processes; tests substitute a
/// scripted launcher to exercise the retry and repeat policy.
pub trait ProcessLauncher: Send + Sync {
    /// Run the command and capture its output.
    fn launch(
        &self,
        spec: &CommandSpec,
    ) -> impl std::future::Future<Output = Result<ProcessOutput, ScriptError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
