//! UI-thread work queue.
//!
//! Background threads never touch host widgets directly. They post closures
//! through a [`UiHandle`]; the UI thread drains the [`UiQueue`] from its run
//! loop and executes the jobs in FIFO order against the live window.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::host::HostWindow;

/// A unit of work executed on the UI thread.
pub type UiJob = Box<dyn FnOnce(&mut dyn HostWindow) + Send + 'static>;

/// Queue owned by the UI thread.
pub struct UiQueue {
    tx: Sender<UiJob>,
    rx: Receiver<UiJob>,
}

/// Cloneable, thread-safe sender side of a [`UiQueue`].
#[derive(Clone)]
pub struct UiHandle {
    tx: Sender<UiJob>,
}

impl UiQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Get a handle that background threads can post through.
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run every job queued so far, in posting order.
    ///
    /// Must be called from the UI thread. Returns the number of jobs run.
    pub fn run_pending(&self, window: &mut dyn HostWindow) -> usize {
        let mut ran = 0;
        loop {
            match self.rx.try_recv() {
                Ok(job) => {
                    job(window);
                    ran += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        ran
    }
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UiHandle {
    /// Post a job to the UI thread.
    ///
    /// Returns `false` if the queue is gone; the job is dropped unrun.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce(&mut dyn HostWindow) + Send + 'static,
    {
        self.tx.send(Box::new(job)).is_ok()
    }
}

impl std::fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle").finish_non_exhaustive()
    }
}
