//! Crate-wide error type.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed command `{command}`: {reason}")]
    MalformedCommand { command: String, reason: String },

    #[error("command `{command}` failed with {}", describe_exit(.exit_code))]
    ProcessFailure {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("command on machine `{machine}` failed with {}", describe_exit(.exit_code))]
    ContainerCommandFailure {
        machine: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("command `{command}` timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("worker thread was already started")]
    WorkerAlreadyStarted,

    #[error("worker thread was never started")]
    WorkerNotStarted,

    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("{host}:{port} did not accept connections within {waited:?}")]
    NotReady {
        host: String,
        port: u16,
        waited: Duration,
    },
}

impl Error {
    /// Exit code carried by a failed run, if the process exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ProcessFailure { exit_code, .. }
            | Self::ContainerCommandFailure { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// Captured standard output of a failed run.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::ProcessFailure { output, .. } | Self::ContainerCommandFailure { output, .. } => {
                Some(output)
            }
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
