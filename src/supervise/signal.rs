use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Observable state of a worker's stop flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    StopRequested,
}

/// Cooperative stop flag backed by an `AtomicBool`.
///
/// The controller sets it; only the worker body decides when to look.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the worker to stop. Idempotent, never blocks.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn state(&self) -> WorkerState {
        if self.is_stop_requested() {
            WorkerState::StopRequested
        } else {
            WorkerState::Running
        }
    }
}
