//! Process execution utilities
//!
//! Provides a unified interface for running external commands with:
//! - Output capture
//! - Directory context
//! - Deadlines (the child is killed when its timeout expires)
//! - Structured failure classification
//!
//! Callers that need to be testable take a [`CommandRunner`] rather than
//! spawning processes directly; [`SystemRunner`] is the real implementation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Output fragments that mean a file or directory was held open by another process.
const FILE_LOCK_SIGNATURES: &[&str] = &[
    "Unable to delete directory",
    "Unable to delete file",
    "being used by another process",
    "Device or resource busy",
];

/// Why a finished command did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "code")]
pub enum FailureKind {
    /// Exited with a non-zero code and no more specific cause was recognised
    NonZeroExit(i32),
    /// A file or directory the command needed was locked by another process
    FileLocked,
    /// Terminated by a signal, no exit code available
    Signalled,
}

/// Classify a finished command from its exit code and captured output.
///
/// Returns `None` for a successful exit.
#[must_use]
pub fn classify_failure(exit_code: Option<i32>, output: &str) -> Option<FailureKind> {
    if exit_code == Some(0) {
        return None;
    }
    if FILE_LOCK_SIGNATURES.iter().any(|sig| output.contains(sig)) {
        return Some(FailureKind::FileLocked);
    }
    Some(match exit_code {
        Some(code) => FailureKind::NonZeroExit(code),
        None => FailureKind::Signalled,
    })
}

/// Description of a command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory, inherited when `None`
    pub cwd: Option<PathBuf>,
    /// Deadline after which the child is killed
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir`
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Kill the child if it runs longer than `timeout`; `None` waits forever
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command, -1 when killed by a signal
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Classified cause when `success` is false
    pub failure: Option<FailureKind>,
}

impl CommandResult {
    /// Build a result from an exit code and captured streams, classifying failures
    pub fn from_parts(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        let failure = classify_failure(exit_code, &format!("{stdout}\n{stderr}"));
        Self {
            success: failure.is_none(),
            exit_code: exit_code.unwrap_or(-1),
            stdout,
            stderr,
            failure,
        }
    }

    /// Create from a finished process status and its raw output
    pub fn from_status(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        Self::from_parts(
            status.code(),
            String::from_utf8_lossy(stdout).to_string(),
            String::from_utf8_lossy(stderr).to_string(),
        )
    }

    /// A successful result with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::from_parts(Some(0), stdout.into(), String::new())
    }

    /// A failed result with the given exit code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::from_parts(Some(exit_code), String::new(), stderr.into())
    }

    /// Get combined output (stdout + stderr)
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Last `lines` non-empty lines of the combined output
    pub fn tail(&self, lines: usize) -> String {
        let combined = self.combined_output();
        let kept: Vec<&str> = combined.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = kept.len().saturating_sub(lines);
        kept[start..].join("\n")
    }

    /// True when the failure was classified as a file lock
    pub fn is_file_locked(&self) -> bool {
        self.failure == Some(FailureKind::FileLocked)
    }
}

/// Something that can execute a [`CommandSpec`]
///
/// `Err` means the command could not be run to completion: it failed to
/// spawn or exceeded its deadline. A command that ran and exited non-zero is
/// `Ok` with `success == false`.
pub trait CommandRunner {
    /// Run the command to completion
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        (**self).run(spec)
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        debug!(command = %spec, cwd = ?spec.cwd, timeout = ?spec.timeout, "Spawning command");
        let mut child = cmd.spawn().map_err(|e| spawn_error(&spec.program, e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match spec.timeout {
            None => child.wait()?,
            Some(limit) => match wait_with_deadline(&mut child, limit)? {
                Some(status) => status,
                None => {
                    // Grandchildren (e.g. the Gradle JVM) may still hold the
                    // pipes open, so the reader threads are left detached.
                    warn!(command = %spec, "Command timed out and was killed");
                    return Err(Error::timeout(&spec.program, limit)
                        .with_context(format!("Running `{spec}`"))
                        .with_suggestion("Raise --timeout or check that the tool is not waiting for input"));
                }
            },
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        let result = CommandResult::from_status(status, &stdout, &stderr);
        debug!(command = %spec, exit_code = result.exit_code, failure = ?result.failure, "Command finished");
        Ok(result)
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::command_not_found(program).with_source(err)
    } else {
        Error::process(format!("Failed to execute {program}: {err}")).with_source(err)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Wait for `child` until `limit` elapses. `Ok(None)` means it was killed.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Run a command and capture output
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandResult> {
    SystemRunner.run(&CommandSpec::new(program).args(args.iter().copied()))
}

/// Run a command in a specific directory
pub fn run_command_in_dir(program: &str, args: &[&str], dir: &Path) -> Result<CommandResult> {
    SystemRunner.run(
        &CommandSpec::new(program)
            .args(args.iter().copied())
            .current_dir(dir),
    )
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}
