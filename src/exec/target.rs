use std::fmt;
use std::path::PathBuf;

use crate::config::ManagerConfig;

use super::command::CommandLine;

/// Where a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionTarget {
    Host,
    /// A booted machine registered with the container manager.
    RunningContainer { machine: String },
    /// A container root filesystem that is not running yet.
    UnspawnedContainer { root_directory: PathBuf },
}

impl ExecutionTarget {
    pub fn machine(name: impl Into<String>) -> Self {
        Self::RunningContainer {
            machine: name.into(),
        }
    }

    pub fn root(directory: impl Into<PathBuf>) -> Self {
        Self::UnspawnedContainer {
            root_directory: directory.into(),
        }
    }

    /// Wrap `command` in the container manager invocation for this target.
    pub fn wrap(&self, manager: &ManagerConfig, command: &CommandLine) -> CommandLine {
        match self {
            Self::Host => command.clone(),
            Self::RunningContainer { machine } => command.wrapped([
                manager.run_program.clone(),
                format!("--machine={machine}"),
                "--wait".to_string(),
                "--quiet".to_string(),
                "--pipe".to_string(),
            ]),
            Self::UnspawnedContainer { root_directory } => {
                let resolv = manager.resolv_conf.display();
                command.wrapped([
                    manager.nspawn_program.clone(),
                    format!("--directory={}", root_directory.display()),
                    format!("--bind-ro={resolv}:{resolv}"),
                    "--pipe".to_string(),
                ])
            }
        }
    }
}

impl fmt::Display for ExecutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("host system"),
            Self::RunningContainer { machine } => write!(f, "container machine {machine}"),
            Self::UnspawnedContainer { root_directory } => {
                write!(f, "container root {}", root_directory.display())
            }
        }
    }
}
