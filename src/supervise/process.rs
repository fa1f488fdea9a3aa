use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::exec::CommandLine;

use super::forward::spawn_stderr_forwarder;
use super::worker::StoppableWorker;

/// A long-running child whose stderr is relayed live by a worker thread.
///
/// Dropping it without [`SupervisedProcess::wait`] kills and reaps a child
/// that is still running; the forwarder then ends on its own.
#[derive(Debug)]
pub struct SupervisedProcess {
    command: String,
    child: Child,
    forwarder: Option<StoppableWorker<io::Result<u64>>>,
}

impl SupervisedProcess {
    /// Spawn `cmd` with stdin closed, stdout inherited and stderr relayed.
    pub fn spawn(cmd: &CommandLine) -> Result<Self> {
        let mut child = Command::new(cmd.program())
            .args(cmd.args())
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: cmd.program().to_string(),
                source,
            })?;

        let forwarder = match child.stderr.take().map(spawn_stderr_forwarder).transpose() {
            Ok(forwarder) => forwarder,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };
        debug!(pid = child.id(), "supervising {cmd}");

        Ok(Self {
            command: cmd.to_string(),
            child,
            forwarder,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Non-blocking exit check.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        Ok(self.child.try_wait()?)
    }

    /// Block until the child exits and its stderr has been fully relayed.
    pub fn wait(mut self) -> Result<ExitStatus> {
        let status = self.child.wait()?;
        info!("{} exited with {status}", self.command);
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.request_stop();
            forwarder.join()??;
        }
        Ok(status)
    }

    /// Ask the child to shut down. Sends SIGTERM on unix so managers like
    /// `systemd-nspawn` can power the container off cleanly.
    pub fn terminate(&mut self) -> Result<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            let pid = libc::pid_t::try_from(self.child.id())
                .map_err(|_| io::Error::other("pid out of range for pid_t"))?;
            // SAFETY: kill() only delivers a signal. The pid belongs to our
            // child, which has not been reaped yet, so it cannot be recycled.
            let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
            if rc != 0 {
                return Err(io::Error::last_os_error().into());
            }
            Ok(())
        }

        #[cfg(not(unix))]
        {
            self.kill()
        }
    }

    pub fn kill(&mut self) -> Result<()> {
        self.child.kill()?;
        Ok(())
    }
}

impl Drop for SupervisedProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            debug!(pid = self.child.id(), "killing unwaited {}", self.command);
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::process::ExitStatusExt;
    use std::time::{Duration, Instant};

    use super::*;

    fn spawn(text: &str) -> SupervisedProcess {
        SupervisedProcess::spawn(&CommandLine::parse(text).unwrap()).unwrap()
    }

    #[test]
    fn wait_reports_exit_status() {
        let proc = spawn("sh -c 'echo starting >&2; exit 3'");
        assert_eq!(proc.command(), "sh -c 'echo starting >&2; exit 3'");
        let status = proc.wait().unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn terminate_sends_sigterm() {
        let mut proc = spawn("sleep 30");
        assert!(proc.try_wait().unwrap().is_none());
        proc.terminate().unwrap();

        let start = Instant::now();
        let status = proc.wait().unwrap();
        assert_eq!(status.signal(), Some(libc::SIGTERM));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn kill_sends_sigkill() {
        let mut proc = spawn("sleep 30");
        proc.kill().unwrap();
        assert_eq!(proc.wait().unwrap().signal(), Some(libc::SIGKILL));
    }

    #[test]
    fn drop_reaps_running_child() {
        let proc = spawn("sleep 30");
        let pid = libc::pid_t::try_from(proc.id()).unwrap();
        assert!(pid > 0);
        drop(proc);
        // SAFETY: signal 0 only checks whether the pid still exists.
        let rc = unsafe { libc::kill(pid, 0) };
        assert_eq!(rc, -1);
        assert_eq!(
            std::io::Error::last_os_error().raw_os_error(),
            Some(libc::ESRCH)
        );
    }

    #[test]
    fn terminate_after_exit_is_noop() {
        let mut proc = spawn("true");
        while proc.try_wait().unwrap().is_none() {
            std::thread::sleep(Duration::from_millis(5));
        }
        proc.terminate().unwrap();
        assert!(proc.wait().unwrap().success());
    }

    #[test]
    fn spawn_failure_names_program() {
        let cmd = CommandLine::parse("postroj-no-such-binary").unwrap();
        let err = SupervisedProcess::spawn(&cmd).unwrap_err();
        match err {
            Error::Spawn { program, .. } => assert_eq!(program, "postroj-no-such-binary"),
            other => panic!("expected Spawn, got: {other:?}"),
        }
    }
}
