use std::path::Path;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::{Config, ManagerConfig};
use crate::error::{Error, Result};
use crate::supervise::SupervisedProcess;

use super::command::CommandLine;
use super::run;
use super::target::ExecutionTarget;
use super::types::{Capture, ExecutionResult, RunOptions};

/// Runs command lines on the host or against containers.
///
/// All entry points share one spawn-and-capture primitive; they differ in
/// the wrapper placed in front of the command and in whether a non-zero
/// exit is an error.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    manager: ManagerConfig,
    default_timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new(manager: ManagerConfig) -> Self {
        Self {
            manager,
            default_timeout: None,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            manager: cfg.manager.clone(),
            default_timeout: cfg.command_timeout(),
        }
    }

    /// Timeout used when a call's [`RunOptions`] do not set one.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn manager(&self) -> &ManagerConfig {
        &self.manager
    }

    /// Run on the host and return captured stdout. Stderr passes through.
    pub fn run_on_host(&self, command: &str) -> Result<String> {
        let cmd = CommandLine::parse(command)?;
        self.run_checked(&cmd)
    }

    /// Run on the host and return whatever it wrote to stderr.
    ///
    /// The exit status is not checked; this is for collecting diagnostics.
    pub fn run_on_host_capture_stderr(&self, command: &str) -> Result<String> {
        let cmd = CommandLine::parse(command)?;
        debug!("Capturing stderr of command on host system: {cmd}");
        let result = self.execute(&cmd, &RunOptions::default(), Capture::Stderr)?;
        if !result.success() {
            debug!("{cmd} exited with {}", result.status);
        }
        Ok(result.stderr_text().unwrap_or_default())
    }

    /// Run inside the booted container `machine` via `systemd-run`.
    ///
    /// Stderr is shown to the operator, stdout is captured and returned.
    /// `options` go straight to the spawned wrapper process.
    pub fn run_in_container(
        &self,
        machine: &str,
        command: &str,
        options: &RunOptions,
    ) -> Result<String> {
        let cmd = CommandLine::parse(command)?;
        info!("Running command on container machine {machine}: {cmd}");
        let wrapped = ExecutionTarget::machine(machine).wrap(&self.manager, &cmd);
        info!("Effective command is: {wrapped}");

        let result = self.execute(&wrapped, options, Capture::Stdout)?;
        let output = result.stdout_text();
        if !result.success() {
            error!("Process exited with {}. Output:\n{output}", result.status);
            return Err(Error::ContainerCommandFailure {
                machine: machine.to_string(),
                exit_code: result.exit_code(),
                output,
            });
        }
        Ok(output)
    }

    /// Run inside a throwaway `systemd-nspawn` environment booted from
    /// `root_directory`, with the host resolver config bound read-only.
    pub fn run_in_container_root(
        &self,
        root_directory: impl AsRef<Path>,
        command: &str,
    ) -> Result<String> {
        let cmd = CommandLine::parse(command)?;
        let wrapped = ExecutionTarget::root(root_directory.as_ref()).wrap(&self.manager, &cmd);
        self.run_checked(&wrapped)
    }

    /// Run against any target and hand back both streams and the status
    /// without judging the exit code.
    pub fn run(
        &self,
        target: &ExecutionTarget,
        command: &str,
        options: &RunOptions,
    ) -> Result<ExecutionResult> {
        let cmd = CommandLine::parse(command)?;
        let wrapped = target.wrap(&self.manager, &cmd);
        info!("Running command on {target}: {wrapped}");
        self.execute(&wrapped, options, Capture::Both)
    }

    /// Start a long-running host command whose stderr is relayed live.
    pub fn spawn_on_host(&self, command: &str) -> Result<SupervisedProcess> {
        let cmd = CommandLine::parse(command)?;
        info!("Starting supervised command on host system: {cmd}");
        SupervisedProcess::spawn(&cmd)
    }

    fn run_checked(&self, cmd: &CommandLine) -> Result<String> {
        info!("Running command on host system: {cmd}");
        let result = self.execute(cmd, &RunOptions::default(), Capture::Stdout)?;
        if !result.success() {
            return Err(Error::ProcessFailure {
                command: cmd.to_string(),
                exit_code: result.exit_code(),
                output: result.stdout_text(),
            });
        }
        Ok(result.stdout_text())
    }

    fn execute(
        &self,
        cmd: &CommandLine,
        options: &RunOptions,
        capture: Capture,
    ) -> Result<ExecutionResult> {
        let timeout = options.timeout_value().or(self.default_timeout);
        run::execute(cmd, options, timeout, capture)
    }
}
