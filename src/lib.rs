//! Process execution and supervision primitives for ephemeral containers.
//!
//! Commands run on the host, inside a booted `systemd-nspawn` machine (via
//! `systemd-run`), or inside a throwaway environment booted from a container
//! root directory. Long-running commands can have their stderr relayed live
//! by a stoppable worker thread, and TCP readiness probes tell when a
//! booting container's service is reachable.

pub mod banner;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod probe;
pub mod rootfs;
pub mod supervise;

pub use error::{Error, Result};
pub use exec::{CommandLine, CommandRunner, ExecutionResult, ExecutionTarget, RunOptions};
pub use probe::{is_up, wait_until_up};
pub use supervise::{StopSignal, StoppableWorker, SupervisedProcess, WorkerState};
