use std::io::{self, Read, Write};
use std::process::{Child, ChildStderr};

use tracing::debug;

use crate::error::Result;

use super::worker::StoppableWorker;

/// Relay `source` into `sink` one byte at a time, flushing after each byte.
///
/// Returns the number of bytes relayed once `source` reaches end-of-data.
/// Single-byte granularity keeps diagnostic output interleaved with other
/// writers in the order it was produced.
pub fn forward<R: Read, W: Write>(mut source: R, mut sink: W) -> io::Result<u64> {
    let mut byte = [0u8; 1];
    let mut count = 0;
    loop {
        match source.read(&mut byte) {
            Ok(0) => return Ok(count),
            Ok(_) => {
                sink.write_all(&byte)?;
                sink.flush()?;
                count += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Relay a child's piped stderr to ours until the child closes it.
///
/// A child whose stderr was not piped (or was already taken) relays nothing.
pub fn forward_stderr(child: &mut Child) -> io::Result<u64> {
    match child.stderr.take() {
        Some(stderr) => forward(stderr, io::stderr()),
        None => Ok(0),
    }
}

/// Host [`forward`] for `stderr` on its own worker thread.
///
/// The body never polls its stop flag: it ends when the pipe closes,
/// which normally happens when the child exits.
pub fn spawn_stderr_forwarder(stderr: ChildStderr) -> Result<StoppableWorker<io::Result<u64>>> {
    StoppableWorker::spawn("stderr-forwarder", move |_stop| {
        let relayed = forward(stderr, io::stderr());
        debug!(?relayed, "stderr forwarder finished");
        relayed
    })
}
