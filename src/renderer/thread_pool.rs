use std::{
    any::Any,
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, mpsc},
    thread::{self, JoinHandle},
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::renderer::WorkerCount;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task panicked: {0}")]
    Panicked(String),
    #[error("Task was dropped before producing a result")]
    Disconnected,
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// FIFO shared between producers and blocking consumers.
pub struct TaskQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        TaskQueue {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> TaskQueue<T> {
        TaskQueue::default()
    }

    // Items are only moved in and out under the lock, a poisoned queue is still consistent.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, item: T) {
        self.lock().items.push_back(item);
        self.available.notify_one();
    }

    pub fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Blocks until an item is available.
    /// Returns `None` once the queue is closed and empty.
    pub fn wait_pop(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wakes all waiting consumers. Items already queued can still be popped.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Result of a task submitted to a `ThreadPool`.
#[must_use]
pub struct TaskHandle<T> {
    receiver: mpsc::Receiver<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finished.
    pub fn wait(self) -> Result<T, TaskError> {
        self.receiver
            .recv()
            .unwrap_or(Err(TaskError::Disconnected))
    }
}

/// Fixed set of worker threads consuming a shared task queue.
pub struct ThreadPool {
    queue: Arc<TaskQueue<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    pub fn new(worker_count: WorkerCount) -> std::io::Result<ThreadPool> {
        let queue = Arc::new(TaskQueue::<Job>::new());
        let mut pool = ThreadPool {
            queue,
            workers: Vec::new(),
        };

        for worker_id in 0..worker_count.get() {
            let queue = Arc::clone(&pool.queue);
            // On error the partially built pool is dropped, which joins the started workers.
            let handle = thread::Builder::new()
                .name(format!("worker{worker_id}"))
                .spawn(move || {
                    debug!(worker_id, "Worker started");
                    while let Some(job) = queue.wait_pop() {
                        job();
                    }
                    debug!(worker_id, "Worker stopped");
                })?;
            pool.workers.push(handle);
        }

        Ok(pool)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queues a task for execution on one of the workers.
    /// A panic inside the task is reported through the handle and doesn't take down the worker.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);
        self.queue.push(Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())));
            // The handle may have been dropped already
            let _ = sender.send(result);
        }));
        TaskHandle { receiver }
    }
}

impl Drop for ThreadPool {
    /// Lets the workers finish every queued task, then joins them.
    fn drop(&mut self) {
        self.queue.close();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
