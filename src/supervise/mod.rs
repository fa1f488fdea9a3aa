// Supervision: stoppable background workers and live stderr relaying.

mod forward;
mod process;
mod signal;
mod worker;

pub use forward::{forward, forward_stderr, spawn_stderr_forwarder};
pub use process::SupervisedProcess;
pub use signal::{StopSignal, WorkerState};
pub use worker::StoppableWorker;
