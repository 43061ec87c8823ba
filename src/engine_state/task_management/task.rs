//! # Task System Core Types
//!
//! This module defines the units of work executed by the
//! [`TaskManager`](super::TaskManager) and the handles used to collect their
//! results.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The caller keeps the returned `TaskHandle`
//! 3. The task's `process()` method runs on a worker thread
//! 4. The output is sent back over the handle's private channel
//! 5. The control loop polls the handle once per tick with `try_take()`
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `Task::Output` must be `Send` to be transferred back
//! - Tasks own everything they read; shared inputs go behind an `Arc`

use std::sync::mpsc::{Receiver, TryRecvError};

/// A unit of work that can be executed on a worker thread.
///
/// Tasks should be self-contained and coarse-grained: a whole chunk's density
/// field, not a single column.
pub trait Task: Send + 'static {
    /// The value handed back to the control loop.
    type Output: Send + 'static;

    /// Performs the work. Runs on a worker thread.
    fn process(self) -> Self::Output;
}

/// The receiving end of a published task.
///
/// Polling never blocks. A task whose worker died before finishing leaves its
/// handle disconnected, which reads as "never completes".
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<T>,
    result: Option<T>,
    disconnected: bool,
}

impl<T> TaskHandle<T> {
    pub(super) fn new(receiver: Receiver<T>) -> Self {
        TaskHandle {
            receiver,
            result: None,
            disconnected: false,
        }
    }

    fn poll(&mut self) {
        if self.result.is_some() || self.disconnected {
            return;
        }
        match self.receiver.try_recv() {
            Ok(result) => self.result = Some(result),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.disconnected = true,
        }
    }

    /// Returns true once the task's output is available.
    pub fn is_completed(&mut self) -> bool {
        self.poll();
        self.result.is_some()
    }

    /// Returns true if the task can no longer complete.
    pub fn is_disconnected(&mut self) -> bool {
        self.poll();
        self.result.is_none() && self.disconnected
    }

    /// Takes the output if the task has finished.
    pub fn try_take(&mut self) -> Option<T> {
        self.poll();
        self.result.take()
    }

    /// Blocks until the task finishes.
    ///
    /// The task must already be on a worker (or have run); a task still sitting
    /// in the manager's queue would never be dispatched while the caller
    /// blocks. Call `TaskManager::wait_for_all` first on teardown paths.
    ///
    /// # Returns
    /// `None` if the task can no longer produce a result.
    pub fn complete(mut self) -> Option<T> {
        if let Some(result) = self.result.take() {
            return Some(result);
        }
        if self.disconnected {
            return None;
        }
        self.receiver.recv().ok()
    }
}
