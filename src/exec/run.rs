use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::command::CommandLine;
use super::types::{Capture, ExecutionResult, RunOptions};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

type Reader = JoinHandle<io::Result<Vec<u8>>>;

/// Spawn `cmd`, feed it any configured input, and block until it exits.
///
/// Captured streams are drained on their own threads so a chatty child
/// cannot stall on a full pipe while we wait on it. With a `timeout`, the
/// child is killed once the deadline passes.
pub(crate) fn execute(
    cmd: &CommandLine,
    options: &RunOptions,
    timeout: Option<Duration>,
    capture: Capture,
) -> Result<ExecutionResult> {
    let mut command = Command::new(cmd.program());
    command.args(cmd.args());
    options.apply(&mut command);
    command
        .stdin(stdio(options.input_bytes().is_some()))
        .stdout(stdio(capture.stdout()))
        .stderr(stdio(capture.stderr()));

    let mut child = command.spawn().map_err(|source| Error::Spawn {
        program: cmd.program().to_string(),
        source,
    })?;
    debug!(pid = child.id(), program = cmd.program(), "spawned");

    // --- pipes -------------------------------------------------------------
    if let (Some(mut stdin), Some(input)) = (child.stdin.take(), options.input_bytes()) {
        let input = input.to_vec();
        thread::spawn(move || {
            // A child that exits without reading its input is not our error.
            if let Err(e) = stdin.write_all(&input)
                && e.kind() != io::ErrorKind::BrokenPipe
            {
                warn!("failed to write child stdin: {e}");
            }
        });
    }
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    // --- wait --------------------------------------------------------------
    let status = match timeout {
        None => child.wait()?,
        Some(limit) => match wait_with_deadline(&mut child, limit)? {
            Some(status) => status,
            None => {
                // Readers are left detached: a grandchild may still hold the pipe.
                return Err(Error::TimedOut {
                    command: cmd.to_string(),
                    timeout: limit,
                });
            }
        },
    };
    debug!(pid = child.id(), %status, "exited");

    Ok(ExecutionResult {
        stdout: collect(stdout)?.unwrap_or_default(),
        stderr: collect(stderr)?,
        status,
    })
}

fn stdio(piped: bool) -> Stdio {
    if piped { Stdio::piped() } else { Stdio::inherit() }
}

fn drain<R: Read + Send + 'static>(mut source: R) -> Reader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        source.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<Reader>) -> Result<Option<Vec<u8>>> {
    let Some(handle) = reader else {
        return Ok(None);
    };
    let bytes = handle
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))??;
    Ok(Some(bytes))
}

/// Poll until the child exits or `limit` elapses. Returns `None` after
/// killing a child that overran.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if start.elapsed() > limit {
            warn!(pid = child.id(), ?limit, "deadline exceeded, killing child");
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL);
    }
}
