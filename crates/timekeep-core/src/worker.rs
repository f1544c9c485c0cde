//! Background work off the foreground command loop.
//!
//! Ancillary jobs (cache resync after a remote write, id-list refresh) run
//! on a single worker thread fed by a bounded queue; the foreground never
//! waits on them. Every submitted job must be idempotent and go through the
//! same cache transaction path as foreground work, so ordering stays
//! uniform and an interrupted command can safely leave a job running.
//!
//! Shutdown is best-effort: the queue stops accepting, already-accepted
//! jobs are drained, and the thread is joined.

use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::JoinHandle;

use crate::error::WorkerError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded single-thread job queue.
pub struct WorkerPool {
    tx: Option<SyncSender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn the worker with room for `capacity` queued jobs.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::sync_channel::<Job>(capacity);
        let handle = std::thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                // One panicking job must not take the queue down.
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job));
                if outcome.is_err() {
                    tracing::warn!("background job panicked");
                }
            }
        });
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue a job without blocking the foreground.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<(), WorkerError> {
        let Some(tx) = &self.tx else {
            return Err(WorkerError::Shutdown);
        };
        tx.try_send(Box::new(job)).map_err(|err| match err {
            TrySendError::Full(_) => WorkerError::QueueFull,
            TrySendError::Disconnected(_) => WorkerError::Shutdown,
        })
    }

    /// Stop accepting work, drain accepted jobs and join the worker.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close();
    }
}
