//! The unhandled-rejection surface.
//!
//! A rejection that reaches the end of a chain with nobody listening should
//! not vanish. When a rejected promise has had no reaction registered and
//! was never awaited, an [`UnhandledRejection`] is reported: through the
//! installed hook if there is one, otherwise as a `tracing` error event.

use std::sync::Arc;

use parking_lot::RwLock;

/// Payload handed to the unhandled-rejection hook. Fired at most once per
/// promise.
#[derive(Debug, Clone)]
pub struct UnhandledRejection {
    /// Identifier of the rejected promise, as returned by
    /// [`Promise::id`](crate::Promise::id).
    pub promise: u64,
    /// Rendered rejection reason.
    pub reason: String,
}

/// When rejected promises are checked for handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPolicy {
    /// Check one scheduler turn after rejection, giving the chain a chance
    /// to attach a handler first. The default.
    #[default]
    Deferred,
    /// Check synchronously at rejection time.
    Immediate,
}

/// Hook invoked with each unhandled rejection.
pub type UnhandledRejectionHook = Arc<dyn Fn(&UnhandledRejection) + Send + Sync>;

static HOOK: RwLock<Option<UnhandledRejectionHook>> = RwLock::new(None);
static POLICY: RwLock<ReportPolicy> = RwLock::new(ReportPolicy::Deferred);

/// Installs the process-wide unhandled-rejection hook, replacing any
/// previous one.
///
/// # Example
/// ```
/// use covenant::{Promise, QueueScheduler, SchedulerRef};
/// use std::sync::Arc;
/// use parking_lot::Mutex;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
/// covenant::set_unhandled_rejection_hook(move |event| sink.lock().push(event.promise));
///
/// let queue = Arc::new(QueueScheduler::new());
/// let sched: SchedulerRef = queue.clone();
/// let p = Promise::<i32, String>::rejected(&sched, "lost".into());
/// queue.run_until_idle();
/// assert_eq!(*seen.lock(), vec![p.id()]);
/// # covenant::take_unhandled_rejection_hook();
/// ```
pub fn set_unhandled_rejection_hook<F>(hook: F)
where
    F: Fn(&UnhandledRejection) + Send + Sync + 'static,
{
    *HOOK.write() = Some(Arc::new(hook));
}

/// Removes the installed hook, restoring the default `tracing` sink, and
/// returns it.
pub fn take_unhandled_rejection_hook() -> Option<UnhandledRejectionHook> {
    HOOK.write().take()
}

/// Sets when rejected promises are checked for handlers.
pub fn set_report_policy(policy: ReportPolicy) {
    *POLICY.write() = policy;
}

pub(crate) fn report_policy() -> ReportPolicy {
    *POLICY.read()
}

pub(crate) fn report(event: UnhandledRejection) {
    let hook = HOOK.read().as_ref().map(Arc::clone);
    match hook {
        Some(hook) => hook(&event),
        None => tracing::error!(
            promise = event.promise,
            reason = %event.reason,
            "unhandled promise rejection"
        ),
    }
}
