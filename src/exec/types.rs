use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::time::Duration;

/// Captured outcome of a finished subordinate process.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Empty when standard output was not captured.
    pub stdout: Vec<u8>,
    pub stderr: Option<Vec<u8>>,
    pub status: ExitStatus,
}

impl ExecutionResult {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> Option<String> {
        self.stderr
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// `None` when the process was terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Which standard streams are piped back to the caller. Streams that are
/// not captured are inherited from the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Stdout,
    Stderr,
    Both,
}

impl Capture {
    pub fn stdout(self) -> bool {
        matches!(self, Capture::Stdout | Capture::Both)
    }

    pub fn stderr(self) -> bool {
        matches!(self, Capture::Stderr | Capture::Both)
    }
}

/// Spawn settings handed through to the subordinate process untouched.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    env: Vec<(OsString, Option<OsString>)>,
    clear_env: bool,
    current_dir: Option<PathBuf>,
    input: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), Some(value.into())));
        self
    }

    pub fn env_remove(mut self, key: impl Into<OsString>) -> Self {
        self.env.push((key.into(), None));
        self
    }

    /// Start from an empty environment; variables set via [`Self::env`] still apply.
    pub fn env_clear(mut self) -> Self {
        self.clear_env = true;
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Bytes written to the child's standard input, which is then closed.
    pub fn input(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.input = Some(bytes.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn input_bytes(&self) -> Option<&[u8]> {
        self.input.as_deref()
    }

    pub fn timeout_value(&self) -> Option<Duration> {
        self.timeout
    }

    /// Apply environment and working directory. Stdio is the runner's business.
    pub(crate) fn apply(&self, command: &mut Command) {
        if self.clear_env {
            command.env_clear();
        }
        for (key, value) in &self.env {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
    }
}
