//! The external collaborator interface: where deferred callbacks run and
//! wrapped computations are driven.
//!
//! The promise core never spins its own thread or loop. Everything it needs
//! from its host is captured by [`Scheduler`]; two reference adapters ship
//! with the crate so the library is usable out of the box:
//! [`QueueScheduler`] for deterministic, single-threaded draining (tests,
//! embedded loops) and [`ThreadScheduler`] for a background worker.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Weak};
use std::task::Context;
use std::thread;

use futures::executor::block_on;
use futures::future::BoxFuture;
use futures::task::{waker, ArcWake};
use parking_lot::Mutex;

/// A deferred, zero-argument unit of work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A wrapped asynchronous computation. Settlement is delivered by the task
/// itself on completion; the scheduler only has to drive it.
pub type Task = BoxFuture<'static, ()>;

/// The capability the promise core requires from its host runtime.
pub trait Scheduler: Send + Sync {
    /// Enqueues `job` to run on a later turn.
    ///
    /// Implementations must never run the job from within this call:
    /// reaction delivery relies on it to keep chains reentrancy-safe.
    fn schedule(&self, job: Job);

    /// Drives `task` until it completes.
    fn spawn(&self, task: Task);
}

/// Shared handle to the host scheduler, held by every promise it settles.
pub type SchedulerRef = Arc<dyn Scheduler>;

struct Shared {
    jobs: Mutex<VecDeque<Job>>,
    ready: Mutex<VecDeque<Arc<TaskCell>>>,
}

struct TaskCell {
    future: Mutex<Option<Task>>,
    shared: Weak<Shared>,
}

impl ArcWake for TaskCell {
    fn wake_by_ref(cell: &Arc<Self>) {
        if let Some(shared) = cell.shared.upgrade() {
            shared.ready.lock().push_back(Arc::clone(cell));
        }
    }
}

/// A deterministic, single-threaded scheduler.
///
/// Jobs run in FIFO order and spawned tasks are polled cooperatively with a
/// real waker, so a task that yields is re-queued and a task that never
/// wakes simply stays parked. Nothing runs until the owner calls
/// [`run_until_idle`](Self::run_until_idle) or [`turn`](Self::turn), which
/// makes settlement order fully reproducible.
///
/// # Example
/// ```
/// use covenant::{Promise, QueueScheduler, SchedulerRef};
/// use std::sync::Arc;
///
/// let queue = Arc::new(QueueScheduler::new());
/// let sched: SchedulerRef = queue.clone();
/// let p = Promise::<i32, String>::resolved(&sched, Ok(1)).then(|v| Ok(v + 1));
/// assert_eq!(p.try_result(), None);
/// queue.run_until_idle();
/// assert_eq!(p.try_result(), Some(Ok(2)));
/// ```
pub struct QueueScheduler {
    shared: Arc<Shared>,
}

impl QueueScheduler {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                jobs: Mutex::new(VecDeque::new()),
                ready: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Runs jobs and polls woken tasks until no further progress is
    /// possible. Tasks that are pending and un-woken are left parked; call
    /// again after the external event they wait for.
    pub fn run_until_idle(&self) {
        loop {
            let job = self.shared.jobs.lock().pop_front();
            if let Some(job) = job {
                job();
                continue;
            }
            let cell = self.shared.ready.lock().pop_front();
            match cell {
                Some(cell) => self.poll_cell(cell),
                None => break,
            }
        }
    }

    /// Runs exactly the jobs queued at the time of the call, then polls the
    /// tasks woken so far. Later enqueues wait for the next turn.
    pub fn turn(&self) {
        let queued = self.shared.jobs.lock().len();
        for _ in 0..queued {
            let job = self.shared.jobs.lock().pop_front();
            match job {
                Some(job) => job(),
                None => break,
            }
        }
        let woken = self.shared.ready.lock().len();
        for _ in 0..woken {
            let cell = self.shared.ready.lock().pop_front();
            match cell {
                Some(cell) => self.poll_cell(cell),
                None => break,
            }
        }
    }

    fn poll_cell(&self, cell: Arc<TaskCell>) {
        // A task woken twice sits in the queue twice; the second pop finds
        // the slot empty and moves on.
        let future = cell.future.lock().take();
        if let Some(mut future) = future {
            let waker = waker(Arc::clone(&cell));
            let mut cx = Context::from_waker(&waker);
            if future.as_mut().poll(&mut cx).is_pending() {
                *cell.future.lock() = Some(future);
            }
        }
    }
}

impl Scheduler for QueueScheduler {
    fn schedule(&self, job: Job) {
        self.shared.jobs.lock().push_back(job);
    }

    fn spawn(&self, task: Task) {
        let cell = Arc::new(TaskCell {
            future: Mutex::new(Some(task)),
            shared: Arc::downgrade(&self.shared),
        });
        self.shared.ready.lock().push_back(cell);
    }
}

impl Default for QueueScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A scheduler backed by a worker thread draining a job channel.
///
/// Wrapped computations each get a dedicated thread driven by
/// [`block_on`], so a blocking [`wait`](crate::Promise::wait) on the caller
/// side always has someone making progress.
pub struct ThreadScheduler {
    jobs: Sender<Job>,
}

impl ThreadScheduler {
    /// Starts the worker thread. It exits once the scheduler is dropped and
    /// the queue runs dry.
    pub fn new() -> Self {
        let (jtx, jrx) = mpsc::channel::<Job>();
        thread::spawn(move || jrx.into_iter().for_each(|job| job()));
        Self { jobs: jtx }
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, job: Job) {
        // A send only fails once the worker is gone; late jobs are dropped.
        let _ = self.jobs.send(job);
    }

    fn spawn(&self, task: Task) {
        thread::spawn(move || block_on(task));
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}
