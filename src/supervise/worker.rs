use std::any::Any;
use std::fmt;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::error::{Error, Result};

use super::signal::{StopSignal, WorkerState};

type Body<T> = Box<dyn FnOnce(StopSignal) -> T + Send + 'static>;

/// A background thread with a cooperative stop flag.
///
/// The body receives a [`StopSignal`] and is expected to check it between
/// units of work. Nothing here interrupts a body that is blocked, e.g. on
/// a pipe read; such a body only sees the request once the blocking call
/// returns.
pub struct StoppableWorker<T> {
    name: Option<String>,
    stack_size: Option<usize>,
    body: Option<Body<T>>,
    stop: StopSignal,
    // `None` inside means the thread never received its body.
    handle: Option<JoinHandle<Option<T>>>,
}

impl<T: Send + 'static> StoppableWorker<T> {
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(StopSignal) -> T + Send + 'static,
    {
        Self {
            name: None,
            stack_size: None,
            body: Some(Box::new(body)),
            stop: StopSignal::new(),
            handle: None,
        }
    }

    /// Like [`Self::new`], naming the OS thread for logs and debuggers.
    pub fn named<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnOnce(StopSignal) -> T + Send + 'static,
    {
        Self {
            name: Some(name.into()),
            ..Self::new(body)
        }
    }

    /// Construct and start in one go.
    pub fn spawn<F>(name: impl Into<String>, body: F) -> Result<Self>
    where
        F: FnOnce(StopSignal) -> T + Send + 'static,
    {
        let mut worker = Self::named(name, body);
        worker.start()?;
        Ok(worker)
    }

    /// Stack size for the worker thread, in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Run the body on its own thread. A worker can only be started once.
    ///
    /// The body is handed over only after the thread exists, so a failed
    /// spawn leaves the worker startable.
    pub fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Err(Error::WorkerAlreadyStarted);
        }
        let body = self.body.take().ok_or(Error::WorkerAlreadyStarted)?;
        let stop = self.stop.clone();
        let (body_tx, body_rx) = mpsc::sync_channel::<Body<T>>(1);

        let mut builder = thread::Builder::new();
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }
        let handle = match builder.spawn(move || body_rx.recv().ok().map(|body| body(stop))) {
            Ok(handle) => handle,
            Err(e) => {
                self.body = Some(body);
                return Err(e.into());
            }
        };
        // The receiver lives until the thread has taken the body.
        if let Err(mpsc::SendError(body)) = body_tx.send(body) {
            self.body = Some(body);
            return Err(Error::WorkerNotStarted);
        }

        self.handle = Some(handle);
        debug!(worker = self.name.as_deref().unwrap_or("unnamed"), "started");
        Ok(())
    }

    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    pub fn state(&self) -> WorkerState {
        self.stop.state()
    }

    /// Shares the flag with another owner, e.g. a signal handler.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.handle.is_some()
    }

    /// True once the body has returned (or panicked).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_some_and(JoinHandle::is_finished)
    }

    /// Wait for the body to return and hand back its value.
    pub fn join(mut self) -> Result<T> {
        let handle = self.handle.take().ok_or(Error::WorkerNotStarted)?;
        handle
            .join()
            .map_err(|payload| Error::WorkerPanicked(panic_message(payload.as_ref())))?
            .ok_or(Error::WorkerNotStarted)
    }
}

impl<T> fmt::Debug for StoppableWorker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoppableWorker")
            .field("name", &self.name)
            .field("state", &self.stop.state())
            .field("started", &self.handle.is_some())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
