//! # Task Management System
//!
//! A worker pool for running density generation off the control loop.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed on a worker
//! - `TaskHandle`: The polled receiving end of a published task
//! - `TaskChannel`: Communication channel between the main thread and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Tasks that find every worker busy wait in a FIFO queue
//! 4. Workers process tasks and report completion on their channel
//! 5. Once per tick the control loop calls `process_completed_tasks()` and
//!    `process_queued_tasks()` to free workers and refill them
//!
//! ## Example Usage
//! ```rust
//! use voxel_terrain::engine_state::task_management::{task::Task, TaskManager};
//!
//! struct Square(u64);
//!
//! impl Task for Square {
//!     type Output = u64;
//!     fn process(self) -> u64 {
//!         self.0 * self.0
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(2);
//! let handle = task_manager.publish_task(Square(12));
//!
//! task_manager.wait_for_all();
//! assert_eq!(handle.complete(), Some(144));
//! ```

pub mod task;

use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use task::{Task, TaskHandle};

/// A type-erased task ready to run on a worker.
type QueuedTask = Box<dyn FnOnce() + Send>;

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker
/// - `completion_receiver`: One message per finished task
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `disconnected`: Set once the worker is found to have exited
/// - `worker`: Handle to the worker thread, joined on drop
#[derive(Debug)]
struct TaskChannel {
    task_sender: Sender<QueuedTask>,
    completion_receiver: Receiver<()>,
    num_tasks_in_flight: usize,
    disconnected: bool,
    worker: Option<JoinHandle<()>>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Tracking task completion
/// - Handling task queuing when all workers are busy
/// - Forcing outstanding work to completion on teardown
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<QueuedTask>,
    current_channel: usize,
    completed_tasks: u64,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 leaves surplus work in the shared queue, where the next
/// free worker picks it up, instead of piling up behind one busy worker.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// A manager with zero workers queues everything; queued work then only
    /// runs through `wait_for_all`, inline on the calling thread.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "Starting {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<QueuedTask>();
            let (done_tx, done_rx) = channel::<()>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    task();
                    let _ = done_tx.send(());
                }
            };

            let worker = thread::spawn(task_closure);

            channels.push(TaskChannel {
                task_sender: task_tx,
                completion_receiver: done_rx,
                num_tasks_in_flight: 0,
                disconnected: false,
                worker: Some(worker),
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
            completed_tasks: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the worker has exited; the channel is marked disconnected
    fn try_send_task(&mut self, task: QueuedTask, channel_idx: usize) -> Result<(), QueuedTask> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                warn!("Task worker {} disconnected", channel_idx);
                channel.disconnected = true;
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel that can accept a new task, using a
    /// round-robin scan starting at the channel after the last one used.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|step| (self.current_channel + step) % count)
            .find(|&index| {
                let channel = &self.channels[index];
                !channel.disconnected && channel.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Sends a task to a free worker or queues it.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    fn dispatch(&mut self, task: QueuedTask) -> bool {
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(_) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// The task starts as soon as a worker becomes available. The returned
    /// handle is the only way to observe its output.
    pub fn publish_task<T: Task>(&mut self, task: T) -> TaskHandle<T::Output> {
        let (result_tx, result_rx) = channel();
        let queued: QueuedTask = Box::new(move || {
            let _ = result_tx.send(task.process());
        });

        if !self.dispatch(queued) {
            debug!(
                "Task queued - all workers busy ({} waiting)",
                self.queued_tasks.len()
            );
        }
        TaskHandle::new(result_rx)
    }

    /// Processes any queued tasks if workers are available.
    ///
    /// Tasks are dispatched in FIFO order until the queue is empty or every
    /// worker is busy. Call once per tick after `process_completed_tasks`.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => self.queued_tasks.push_front(task),
            }
        }
    }

    /// Drains completion notices from every worker without blocking.
    ///
    /// # Returns
    /// The number of tasks that finished since the last call.
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut finished = 0;
        for channel in &mut self.channels {
            loop {
                match channel.completion_receiver.try_recv() {
                    Ok(()) => {
                        channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);
                        finished += 1;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        channel.disconnected = true;
                        channel.num_tasks_in_flight = 0;
                        break;
                    }
                }
            }
        }
        self.completed_tasks += finished as u64;
        finished
    }

    /// Runs every queued and in-flight task to completion, blocking the caller.
    ///
    /// This is the teardown path. When no worker can take work, the remaining
    /// queue is executed inline on the calling thread.
    pub fn wait_for_all(&mut self) {
        loop {
            self.process_completed_tasks();
            self.process_queued_tasks();

            if let Some(channel) = self
                .channels
                .iter_mut()
                .find(|channel| channel.num_tasks_in_flight > 0)
            {
                match channel.completion_receiver.recv() {
                    Ok(()) => {
                        channel.num_tasks_in_flight -= 1;
                        self.completed_tasks += 1;
                    }
                    Err(_) => {
                        channel.disconnected = true;
                        channel.num_tasks_in_flight = 0;
                    }
                }
                continue;
            }

            if self.queued_tasks.is_empty() {
                break;
            }

            debug!(
                "No workers available, running {} queued tasks inline",
                self.queued_tasks.len()
            );
            while let Some(task) = self.queued_tasks.pop_front() {
                task();
                self.completed_tasks += 1;
            }
        }
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Number of tasks waiting for a worker.
    pub fn num_queued_tasks(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks currently on workers.
    pub fn num_tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Total number of tasks observed to finish.
    pub fn completed_tasks(&self) -> u64 {
        self.completed_tasks
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        let dropped = self.queued_tasks.len();
        if dropped > 0 {
            warn!("Dropping task manager with {} queued tasks", dropped);
        }
        self.queued_tasks.clear();

        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender,
                worker,
                ..
            } = channel;
            drop(task_sender);
            if let Some(worker) = worker {
                let _ = worker.join();
            }
        }
    }
}
