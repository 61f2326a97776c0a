//! # Task Management System
//!
//! Runs expensive work, such as generating a whole new world, on background
//! threads so the simulation thread never stalls on it.
//!
//! ## Architecture Overview
//! - `TaskManager`: owns the worker threads and distributes tasks round-robin
//! - `Task`: a self-contained unit of work run on a worker
//! - `TaskResult`: the output of a task, applied back on the simulation thread
//! - `TaskChannel`: the pair of channels connecting the manager to one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands each task to a free worker, or queues it
//! 3. Workers call `Task::process` and send the result back
//! 4. `process_completed_tasks()` applies results on the simulation thread
//! 5. Results can spawn follow-up tasks, which are published in turn
//!
//! There is no cancellation: a running task always completes. A caller that
//! no longer wants a result simply drops the manager, which discards every
//! result that has not been handled yet.
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut task_manager = TaskManager::new(2);
//! task_manager.publish_task(Box::new(MyTask::new()));
//!
//! // Once per frame:
//! task_manager.process_completed_tasks(&mut context);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};
use task::{Task, TaskContext, TaskResult};

/// A communication channel between the simulation thread and one worker.
///
/// Dropping the channel closes the task sender, which ends the worker loop.
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    /// Cleared once the worker is found to have exited.
    alive: bool,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Kept at 1 so each worker finishes its task before receiving the next one.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a manager with `num_workers` worker threads (at least one).
    pub fn new(num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    debug!("Worker {index} processing task {}", task.name());
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                alive: true,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Sends a task to a specific worker, returning it if the worker is gone.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                error!("Task worker {channel_idx} disconnected");
                channel.alive = false;
                Err(task.0)
            }
        }
    }

    /// Finds a worker below `MAX_TASKS_IN_FLIGHT`, round-robin from the last one used.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| {
                let channel = &self.channels[idx];
                channel.alive && channel.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Publishes a new task for execution.
    ///
    /// Returns `true` if the task went straight to a worker and `false` if it
    /// was queued because every worker is busy.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        let name = task.name();
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    debug!("Scheduled task {name} on worker {channel_idx}");
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    self.process_queued_tasks();
                    false
                }
            },
            None => {
                debug!("All workers busy, queueing task {name}");
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to free workers, oldest first.
    ///
    /// A worker that turns out to be dead is skipped from then on and its task
    /// goes back to the front of the queue.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => self.queued_tasks.push_front(task),
            }
        }
    }

    fn apply_result(
        result: Box<dyn TaskResult + Send>,
        context: &mut TaskContext<'_>,
        follow_ups: &mut Vec<Box<dyn Task + Send>>,
    ) {
        follow_ups.extend(result.handle_result(context));
    }

    /// Applies every result that has arrived, without blocking.
    ///
    /// Returns the number of results handled.
    pub fn process_completed_tasks(&mut self, context: &mut TaskContext<'_>) -> usize {
        let mut follow_ups = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                Self::apply_result(result, context, &mut follow_ups);
                handled += 1;
            }
        }

        for task in follow_ups {
            self.publish_task(task);
        }
        handled
    }

    /// Number of tasks queued or running.
    pub fn pending_tasks(&self) -> usize {
        self.queued_tasks.len()
            + self
                .channels
                .iter()
                .map(|channel| channel.num_tasks_in_flight)
                .sum::<usize>()
    }

    /// Blocks until every queued and running task, including follow-ups, is handled.
    ///
    /// Returns the number of results handled. A worker that dies mid-task is
    /// logged and its task counted as lost.
    pub fn wait_for_completion(&mut self, context: &mut TaskContext<'_>) -> usize {
        let mut handled = 0;
        loop {
            self.process_queued_tasks();
            if self.pending_tasks() == 0 {
                return handled;
            }

            let mut follow_ups = Vec::new();
            for (idx, channel) in self.channels.iter_mut().enumerate() {
                if channel.num_tasks_in_flight == 0 {
                    continue;
                }
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        Self::apply_result(result, context, &mut follow_ups);
                        handled += 1;
                    }
                    Err(_) => {
                        error!("Task worker {idx} stopped with tasks in flight");
                        channel.num_tasks_in_flight = 0;
                        channel.alive = false;
                    }
                }
            }
            for task in follow_ups {
                self.publish_task(task);
            }

            if self.channels.iter().all(|channel| !channel.alive) {
                error!(
                    "No live task workers left, dropping {} queued tasks",
                    self.queued_tasks.len()
                );
                self.queued_tasks.clear();
            }
        }
    }
}
