//! The promise state machine: settlement, reactions, chaining.

use std::fmt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use futures::future::{AbortHandle, Abortable};
use parking_lot::Mutex;

use crate::diagnostics::{self, ReportPolicy, UnhandledRejection};
use crate::error::{panic_message, Rejection, Settled};
use crate::resolution::Resolution;
use crate::scheduler::SchedulerRef;
use crate::thenable::{RejectFn, ResolveFn, Thenable};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Settlement state, observable through [`Promise::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Not yet settled.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a [`Rejection`].
    Rejected,
}

pub(crate) type Reaction<T, E> = Box<dyn FnOnce(Settled<T, E>) + Send>;

enum Lifecycle<T, E> {
    Pending {
        reactions: Vec<Reaction<T, E>>,
        wakers: Vec<Waker>,
        abort: Option<AbortHandle>,
    },
    Fulfilled(T),
    Rejected(Rejection<E>),
}

struct Inner<T, E> {
    id: u64,
    sched: SchedulerRef,
    lifecycle: Mutex<Lifecycle<T, E>>,
    // Set once any reaction is registered or the promise is awaited; a
    // rejected promise that was never observed surfaces the
    // unhandled-rejection diagnostic.
    observed: AtomicBool,
    reported: AtomicBool,
}

/// A single-assignment, asynchronous result container.
///
/// A `Promise` starts `Pending` and settles exactly once, to `Fulfilled`
/// with a flat value of type `T` or to `Rejected` with a [`Rejection<E>`].
/// Work is chained with [`then`](Self::then), failures are recovered with
/// [`catch`](Self::catch), and every registered reaction is delivered
/// exactly once, in registration order, through the promise's
/// [`Scheduler`](crate::Scheduler), never synchronously from within the
/// registering call.
///
/// Handles are cheap clones of shared state; settling any clone settles
/// them all.
///
/// # States
/// Pending (work outstanding), fulfilled (value ready), or rejected
/// (failure ready). Settlement is monotonic: once left, Pending is never
/// re-entered, and later `resolve`/`reject` calls are ignored.
///
/// # Error handling
/// Success or failure is a `Result`, as with the rest of the ecosystem.
/// Panics inside producers and handlers are caught and converted into
/// [`Rejection::Panicked`], so a misbehaving callback rejects its chain
/// instead of tearing down the scheduler.
///
/// # Example
/// ```
/// use covenant::{Promise, QueueScheduler, SchedulerRef};
/// use std::sync::Arc;
///
/// let queue = Arc::new(QueueScheduler::new());
/// let sched: SchedulerRef = queue.clone();
///
/// let p = Promise::<i32, String>::resolved(&sched, Ok(2))
///     .then(|v| Ok(v * 10))
///     .then(|v| Ok(v + 5));
/// queue.run_until_idle();
/// assert_eq!(p.try_result(), Some(Ok(25)));
/// ```
pub struct Promise<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.inner.lifecycle.lock() {
            Lifecycle::Pending { .. } => "Pending",
            Lifecycle::Fulfilled(_) => "Fulfilled",
            Lifecycle::Rejected(_) => "Rejected",
        };
        f.debug_struct("Promise")
            .field("id", &self.inner.id)
            .field("state", &state)
            .finish()
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + fmt::Debug + Send + 'static,
{
    fn pending_on(sched: SchedulerRef) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                sched,
                lifecycle: Mutex::new(Lifecycle::Pending {
                    reactions: Vec::new(),
                    wakers: Vec::new(),
                    abort: None,
                }),
                observed: AtomicBool::new(false),
                reported: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a promise with no producer attached. Settle it later through
    /// [`resolve`](Self::resolve) or [`reject`](Self::reject) on any clone.
    ///
    /// # Example
    /// ```
    /// # use covenant::{Promise, QueueScheduler, SchedulerRef};
    /// # use std::sync::Arc;
    /// # let queue = Arc::new(QueueScheduler::new());
    /// # let sched: SchedulerRef = queue.clone();
    /// let p = Promise::<i32, String>::pending(&sched);
    /// let doubled = p.then(|v| Ok(v * 2));
    /// p.resolve(Ok(21));
    /// queue.run_until_idle();
    /// assert_eq!(doubled.try_result(), Some(Ok(42)));
    /// ```
    pub fn pending(sched: &SchedulerRef) -> Self {
        Self::pending_on(Arc::clone(sched))
    }

    /// Spawns a promise that runs `producer` as a scheduled job.
    ///
    /// The producer's return value feeds the resolution procedure, so it
    /// may be a `Result`, another `Promise`, or a
    /// [`Resolution`](crate::Resolution). A panicking producer rejects the
    /// promise with [`Rejection::Panicked`].
    ///
    /// # Example
    /// ```
    /// use covenant::{Promise, SchedulerRef, ThreadScheduler};
    /// use std::sync::Arc;
    ///
    /// let sched: SchedulerRef = Arc::new(ThreadScheduler::new());
    /// let p = Promise::<i32, String>::new(&sched, || Ok(21)).then(|v| Ok(v * 2));
    /// assert_eq!(p.wait(), Ok(42));
    /// ```
    pub fn new<F, R>(sched: &SchedulerRef, producer: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: Into<Resolution<T, E>>,
    {
        let promise = Self::pending_on(Arc::clone(sched));
        let settler = promise.clone();
        promise.inner.sched.schedule(Box::new(move || {
            settler.settle_output(catch_unwind(AssertUnwindSafe(producer)));
        }));
        promise
    }

    /// Creates a promise resolved with `value`.
    ///
    /// The value is routed through the resolution procedure, so passing
    /// another promise adopts it rather than storing it.
    pub fn resolved(
        sched: &SchedulerRef,
        value: impl Into<Resolution<T, E>>,
    ) -> Self {
        let promise = Self::pending_on(Arc::clone(sched));
        promise.resolve(value);
        promise
    }

    /// Creates a promise rejected with `error`. Rejection values are never
    /// unwrapped.
    pub fn rejected(sched: &SchedulerRef, error: E) -> Self {
        let promise = Self::pending_on(Arc::clone(sched));
        promise.reject(error);
        promise
    }

    /// Creates a promise settled from an existing `Result`.
    pub fn from_result(sched: &SchedulerRef, result: Result<T, E>) -> Self {
        Self::resolved(sched, result)
    }

    /// Wraps an external asynchronous computation.
    ///
    /// The future is handed to the scheduler's
    /// [`spawn`](crate::Scheduler::spawn); its completion settles the
    /// promise, and [`cancel`](Self::cancel) aborts it while still pending.
    ///
    /// # Example
    /// ```
    /// # use covenant::{Promise, QueueScheduler, SchedulerRef};
    /// # use std::sync::Arc;
    /// # let queue = Arc::new(QueueScheduler::new());
    /// # let sched: SchedulerRef = queue.clone();
    /// let p = Promise::<i32, String>::from_future(&sched, async { Ok(5) });
    /// queue.run_until_idle();
    /// assert_eq!(p.try_result(), Some(Ok(5)));
    /// ```
    pub fn from_future<F>(sched: &SchedulerRef, future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let promise = Self::pending_on(Arc::clone(sched));
        let (handle, registration) = AbortHandle::new_pair();
        if let Lifecycle::Pending { abort, .. } = &mut *promise.inner.lifecycle.lock() {
            *abort = Some(handle);
        }
        let settler = promise.clone();
        promise.inner.sched.spawn(Box::pin(async move {
            match Abortable::new(future, registration).await {
                Ok(Ok(value)) => {
                    settler.settle_fulfilled(value);
                }
                Ok(Err(error)) => {
                    settler.settle_rejected(Rejection::Rejected(error));
                }
                Err(_aborted) => {
                    settler.settle_rejected(Rejection::Cancelled);
                }
            }
        }));
        promise
    }

    /// Attempts to settle the promise with `value` via the resolution
    /// procedure: plain values fulfill, promises are adopted, foreign
    /// thenables are absorbed, errors reject. Resolving the promise with
    /// itself rejects it with [`Rejection::Cyclic`].
    ///
    /// Idempotent once settled: later calls are ignored, not errors.
    pub fn resolve(&self, value: impl Into<Resolution<T, E>>) {
        match value.into() {
            Resolution::Value(value) => {
                self.settle_fulfilled(value);
            }
            Resolution::Error(error) => {
                self.settle_rejected(Rejection::Rejected(error));
            }
            Resolution::Promise(other) => self.adopt(other),
            Resolution::Foreign(thenable) => self.absorb(thenable),
        }
    }

    /// Attempts to settle the promise with a rejection. The error is stored
    /// as-is, never unwrapped. Idempotent once settled.
    pub fn reject(&self, error: E) {
        self.settle_rejected(Rejection::Rejected(error));
    }

    /// Registers a fulfillment handler and returns the child promise that
    /// receives its outcome.
    ///
    /// The handler's return feeds the child's resolution procedure, so
    /// returning a promise chains it in. A rejection passes through to the
    /// child unchanged, and a panicking handler rejects the child. Delivery
    /// is always deferred to the scheduler, even when this promise is
    /// already settled at registration time.
    ///
    /// # Example
    /// ```
    /// # use covenant::{Promise, QueueScheduler, SchedulerRef};
    /// # use std::sync::Arc;
    /// # let queue = Arc::new(QueueScheduler::new());
    /// # let sched: SchedulerRef = queue.clone();
    /// let p = Promise::<i32, String>::resolved(&sched, Ok(10))
    ///     .then(|v| Ok(v.to_string()));
    /// queue.run_until_idle();
    /// assert_eq!(p.try_result(), Some(Ok("10".to_string())));
    /// ```
    pub fn then<U, R, F>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> R + Send + 'static,
        R: Into<Resolution<U, E>>,
    {
        let child = Promise::pending_on(Arc::clone(&self.inner.sched));
        let settler = child.clone();
        self.subscribe(Box::new(move |settled| match settled {
            Ok(value) => {
                settler.settle_output(catch_unwind(AssertUnwindSafe(move || on_fulfilled(value))));
            }
            Err(reason) => {
                settler.settle_rejected(reason);
            }
        }));
        child
    }

    /// Registers a rejection handler and returns the child promise.
    ///
    /// A fulfillment passes through unchanged. A handler that returns
    /// normally converts the rejection into fulfillment for the child;
    /// this is the single recovery mechanism in the library.
    ///
    /// # Example
    /// ```
    /// # use covenant::{Promise, QueueScheduler, Rejection, SchedulerRef};
    /// # use std::sync::Arc;
    /// # let queue = Arc::new(QueueScheduler::new());
    /// # let sched: SchedulerRef = queue.clone();
    /// let p = Promise::<usize, String>::rejected(&sched, "boom".to_string())
    ///     .catch(|reason| match reason {
    ///         Rejection::Rejected(e) => Ok(e.len()),
    ///         other => Err(other.to_string()),
    ///     });
    /// queue.run_until_idle();
    /// assert_eq!(p.try_result(), Some(Ok(4)));
    /// ```
    pub fn catch<R, F>(&self, on_rejected: F) -> Promise<T, E>
    where
        F: FnOnce(Rejection<E>) -> R + Send + 'static,
        R: Into<Resolution<T, E>>,
    {
        let child = Promise::pending_on(Arc::clone(&self.inner.sched));
        let settler = child.clone();
        self.subscribe(Box::new(move |settled| match settled {
            Ok(value) => {
                settler.settle_fulfilled(value);
            }
            Err(reason) => {
                settler.settle_output(catch_unwind(AssertUnwindSafe(move || on_rejected(reason))));
            }
        }));
        child
    }

    /// The two-armed form of [`then`](Self::then)/[`catch`](Self::catch):
    /// exactly one of the handlers runs, and both feed the same child, which
    /// may change the error type.
    pub fn then_catch<U, E2, F, G, RF, RG>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, E2>
    where
        U: Clone + Send + 'static,
        E2: Clone + fmt::Debug + Send + 'static,
        F: FnOnce(T) -> RF + Send + 'static,
        RF: Into<Resolution<U, E2>>,
        G: FnOnce(Rejection<E>) -> RG + Send + 'static,
        RG: Into<Resolution<U, E2>>,
    {
        let child = Promise::pending_on(Arc::clone(&self.inner.sched));
        let settler = child.clone();
        self.subscribe(Box::new(move |settled| match settled {
            Ok(value) => {
                settler.settle_output(catch_unwind(AssertUnwindSafe(move || on_fulfilled(value))));
            }
            Err(reason) => {
                settler.settle_output(catch_unwind(AssertUnwindSafe(move || on_rejected(reason))));
            }
        }));
        child
    }

    /// Registers a callback that runs on either outcome; the child settles
    /// with this promise's outcome once the callback returns. A panicking
    /// callback rejects the child instead.
    pub fn lastly<F>(&self, on_settled: F) -> Promise<T, E>
    where
        F: FnOnce() + Send + 'static,
    {
        let child = Promise::pending_on(Arc::clone(&self.inner.sched));
        let settler = child.clone();
        self.subscribe(Box::new(move |settled| {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(on_settled)) {
                settler.settle_rejected(Rejection::Panicked(panic_message(payload)));
                return;
            }
            match settled {
                Ok(value) => {
                    settler.settle_fulfilled(value);
                }
                Err(reason) => {
                    settler.settle_rejected(reason);
                }
            }
        }));
        child
    }

    /// Maps the fulfillment value, passing rejections through unchanged.
    ///
    /// Convenience over [`then`](Self::then) for plain `Result`-returning
    /// transforms.
    ///
    /// # Example
    /// ```
    /// # use covenant::{Promise, QueueScheduler, SchedulerRef};
    /// # use std::sync::Arc;
    /// # let queue = Arc::new(QueueScheduler::new());
    /// # let sched: SchedulerRef = queue.clone();
    /// let p = Promise::<i32, String>::resolved(&sched, Ok(3)).map(|v| Ok(v * 2));
    /// queue.run_until_idle();
    /// assert_eq!(p.try_result(), Some(Ok(6)));
    /// ```
    pub fn map<U, F>(&self, callback: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.then(callback)
    }

    /// Maps the domain rejection payload, passing fulfillments through
    /// unchanged. The errback may also recover by returning `Ok`.
    ///
    /// Machinery rejections ([`Cyclic`](Rejection::Cyclic),
    /// [`Panicked`](Rejection::Panicked), [`Cancelled`](Rejection::Cancelled))
    /// carry no payload and convert structurally.
    pub fn map_err<E2, F>(&self, errback: F) -> Promise<T, E2>
    where
        E2: Clone + fmt::Debug + Send + 'static,
        F: FnOnce(E) -> Result<T, E2> + Send + 'static,
    {
        let child = Promise::pending_on(Arc::clone(&self.inner.sched));
        let settler = child.clone();
        self.subscribe(Box::new(move |settled| match settled {
            Ok(value) => {
                settler.settle_fulfilled(value);
            }
            Err(reason) => match reason.retag() {
                Err(error) => {
                    settler.settle_output(catch_unwind(AssertUnwindSafe(move || errback(error))));
                }
                Ok(reason) => {
                    settler.settle_rejected(reason);
                }
            },
        }));
        child
    }

    /// Cancels a still-pending promise: aborts the wrapped computation, if
    /// any, and rejects with [`Rejection::Cancelled`]. Returns whether this
    /// call caused the cancellation; settled promises are left untouched.
    ///
    /// # Example
    /// ```
    /// # use covenant::{Promise, QueueScheduler, Rejection, SchedulerRef};
    /// # use std::sync::Arc;
    /// # let queue = Arc::new(QueueScheduler::new());
    /// # let sched: SchedulerRef = queue.clone();
    /// let p = Promise::<i32, String>::from_future(&sched, futures::future::pending());
    /// assert!(p.cancel());
    /// assert!(!p.cancel());
    /// queue.run_until_idle();
    /// assert_eq!(p.try_result(), Some(Err(Rejection::Cancelled)));
    /// ```
    pub fn cancel(&self) -> bool {
        let abort = {
            let mut lifecycle = self.inner.lifecycle.lock();
            match &mut *lifecycle {
                Lifecycle::Pending { abort, .. } => abort.take(),
                _ => return false,
            }
        };
        if let Some(handle) = abort {
            handle.abort();
        }
        self.settle_rejected(Rejection::Cancelled)
    }

    /// Current settlement state.
    pub fn state(&self) -> State {
        match &*self.inner.lifecycle.lock() {
            Lifecycle::Pending { .. } => State::Pending,
            Lifecycle::Fulfilled(_) => State::Fulfilled,
            Lifecycle::Rejected(_) => State::Rejected,
        }
    }

    /// The settled outcome, or `None` while pending. Inspection only: it
    /// does not count as handling a rejection.
    pub fn try_result(&self) -> Option<Settled<T, E>> {
        match &*self.inner.lifecycle.lock() {
            Lifecycle::Pending { .. } => None,
            Lifecycle::Fulfilled(value) => Some(Ok(value.clone())),
            Lifecycle::Rejected(reason) => Some(Err(reason.clone())),
        }
    }

    /// Process-unique identifier, echoed by the diagnostics surface.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Blocks the calling thread until the promise settles.
    ///
    /// This is a host-side bridge, not a core operation: it requires a
    /// scheduler driven concurrently (such as
    /// [`ThreadScheduler`](crate::ThreadScheduler)) and must not be called
    /// from scheduler jobs. If the scheduler shuts down before delivery,
    /// the outcome is reported as [`Rejection::Cancelled`].
    pub fn wait(&self) -> Settled<T, E> {
        let (tx, rx) = oneshot::channel();
        self.subscribe(Box::new(move |settled| {
            let _ = tx.send(settled);
        }));
        rx.recv().unwrap_or(Err(Rejection::Cancelled))
    }

    /// Registers a raw reaction. Reactions registered before settlement run
    /// in registration order afterwards; on an already-settled promise the
    /// reaction is scheduled immediately but still never runs inline.
    pub(crate) fn subscribe(&self, reaction: Reaction<T, E>) {
        self.inner.observed.store(true, Ordering::Release);
        let settled = {
            let mut lifecycle = self.inner.lifecycle.lock();
            match &mut *lifecycle {
                Lifecycle::Pending { reactions, .. } => {
                    reactions.push(reaction);
                    return;
                }
                Lifecycle::Fulfilled(value) => Ok(value.clone()),
                Lifecycle::Rejected(reason) => Err(reason.clone()),
            }
        };
        self.inner.sched.schedule(Box::new(move || reaction(settled)));
    }

    fn adopt(&self, other: Promise<T, E>) {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            self.settle_rejected(Rejection::Cyclic);
            return;
        }
        let target = self.clone();
        other.subscribe(Box::new(move |settled| match settled {
            // The adoptee's value is already flat; no second resolution pass.
            Ok(value) => {
                target.settle_fulfilled(value);
            }
            Err(reason) => {
                target.settle_rejected(reason);
            }
        }));
    }

    fn absorb(&self, thenable: Box<dyn Thenable<T, E>>) {
        let called = Arc::new(AtomicBool::new(false));

        let target = self.clone();
        let guard = Arc::clone(&called);
        let resolve: ResolveFn<T, E> = Box::new(move |resolution| {
            if !guard.swap(true, Ordering::AcqRel) {
                target.resolve(resolution);
            }
        });

        let target = self.clone();
        let guard = Arc::clone(&called);
        let reject: RejectFn<E> = Box::new(move |error| {
            if !guard.swap(true, Ordering::AcqRel) {
                target.reject(error);
            }
        });

        match catch_unwind(AssertUnwindSafe(move || thenable.then(resolve, reject))) {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                // Only rejects if no callback won first.
                if !called.swap(true, Ordering::AcqRel) {
                    self.settle_rejected(Rejection::Rejected(error));
                }
            }
            Err(payload) => {
                if !called.swap(true, Ordering::AcqRel) {
                    self.settle_rejected(Rejection::Panicked(panic_message(payload)));
                }
            }
        }
    }

    fn settle_output<R>(&self, outcome: std::thread::Result<R>)
    where
        R: Into<Resolution<T, E>>,
    {
        match outcome {
            Ok(resolution) => self.resolve(resolution),
            Err(payload) => {
                self.settle_rejected(Rejection::Panicked(panic_message(payload)));
            }
        }
    }

    pub(crate) fn settle_fulfilled(&self, value: T) -> bool {
        let (reactions, wakers) = {
            let mut lifecycle = self.inner.lifecycle.lock();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Fulfilled(value.clone())) {
                Lifecycle::Pending {
                    reactions, wakers, ..
                } => (reactions, wakers),
                settled => {
                    // Lost the settlement race; put the original back.
                    *lifecycle = settled;
                    return false;
                }
            }
        };
        tracing::trace!(promise = self.inner.id, reactions = reactions.len(), "fulfilled");
        for waker in wakers {
            waker.wake();
        }
        for reaction in reactions {
            let value = value.clone();
            self.inner.sched.schedule(Box::new(move || reaction(Ok(value))));
        }
        true
    }

    pub(crate) fn settle_rejected(&self, reason: Rejection<E>) -> bool {
        let (reactions, wakers) = {
            let mut lifecycle = self.inner.lifecycle.lock();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Rejected(reason.clone())) {
                Lifecycle::Pending {
                    reactions, wakers, ..
                } => (reactions, wakers),
                settled => {
                    *lifecycle = settled;
                    return false;
                }
            }
        };
        tracing::trace!(promise = self.inner.id, reason = %reason, "rejected");
        for waker in wakers {
            waker.wake();
        }
        for reaction in reactions {
            let reason = reason.clone();
            self.inner.sched.schedule(Box::new(move || reaction(Err(reason))));
        }
        self.arm_unhandled_check(reason);
        true
    }

    fn arm_unhandled_check(&self, reason: Rejection<E>) {
        if self.inner.observed.load(Ordering::Acquire) {
            return;
        }
        let target = self.clone();
        let check = move || {
            if target.inner.observed.load(Ordering::Acquire) {
                return;
            }
            if target.inner.reported.swap(true, Ordering::AcqRel) {
                return;
            }
            diagnostics::report(UnhandledRejection {
                promise: target.inner.id,
                reason: reason.to_string(),
            });
        };
        match diagnostics::report_policy() {
            ReportPolicy::Immediate => check(),
            ReportPolicy::Deferred => self.inner.sched.schedule(Box::new(check)),
        }
    }
}

impl<T, E> Future for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + fmt::Debug + Send + 'static,
{
    type Output = Settled<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Awaiting counts as observing the outcome.
        self.inner.observed.store(true, Ordering::Release);
        let mut lifecycle = self.inner.lifecycle.lock();
        match &mut *lifecycle {
            Lifecycle::Pending { wakers, .. } => {
                wakers.push(cx.waker().clone());
                Poll::Pending
            }
            Lifecycle::Fulfilled(value) => Poll::Ready(Ok(value.clone())),
            Lifecycle::Rejected(reason) => Poll::Ready(Err(reason.clone())),
        }
    }
}
