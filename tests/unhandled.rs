// The unhandled-rejection surface. The hook is process-wide, so these tests
// serialize on a shared guard.

use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;

use covenant::{Promise, QueueScheduler, ReportPolicy, SchedulerRef};

static GUARD: Mutex<()> = Mutex::new(());

fn lab() -> (Arc<QueueScheduler>, SchedulerRef) {
    let queue = Arc::new(QueueScheduler::new());
    let sched: SchedulerRef = queue.clone();
    (queue, sched)
}

fn install_sink() -> Arc<Mutex<Vec<u64>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    covenant::set_unhandled_rejection_hook(move |event| sink.lock().push(event.promise));
    seen
}

#[test]
fn an_unobserved_rejection_reports_exactly_once() {
    let _guard = GUARD.lock();
    let seen = install_sink();
    let (queue, sched) = lab();

    let p = Promise::<i32, String>::rejected(&sched, "lost".to_string());
    queue.run_until_idle();
    queue.run_until_idle();
    assert_eq!(*seen.lock(), vec![p.id()]);

    covenant::take_unhandled_rejection_hook();
}

#[test]
fn an_attached_handler_suppresses_the_report() {
    let _guard = GUARD.lock();
    let seen = install_sink();
    let (queue, sched) = lab();

    let p = Promise::<i32, String>::rejected(&sched, "handled".to_string());
    let recovered = p.catch(|_| Ok(0));
    queue.run_until_idle();
    assert_eq!(recovered.try_result(), Some(Ok(0)));
    assert!(seen.lock().is_empty());

    covenant::take_unhandled_rejection_hook();
}

#[test]
fn awaiting_counts_as_observing() {
    let _guard = GUARD.lock();
    let seen = install_sink();
    let (queue, sched) = lab();

    let p = Promise::<i32, String>::rejected(&sched, "seen".to_string());
    let polled = p.clone().now_or_never();
    assert!(polled.is_some());
    queue.run_until_idle();
    assert!(seen.lock().is_empty());

    covenant::take_unhandled_rejection_hook();
}

#[test]
fn only_the_terminal_link_of_a_chain_reports() {
    let _guard = GUARD.lock();
    let seen = install_sink();
    let (queue, sched) = lab();

    let tail = Promise::then(
        &Promise::then(&Promise::<i32, String>::rejected(&sched, "tail".to_string()), |v| Ok(v)),
        |v| Ok(v + 1),
    );
    queue.run_until_idle();
    queue.run_until_idle();
    assert_eq!(*seen.lock(), vec![tail.id()]);

    covenant::take_unhandled_rejection_hook();
}

#[test]
fn immediate_policy_reports_at_rejection_time() {
    let _guard = GUARD.lock();
    let seen = install_sink();
    let (_queue, sched) = lab();

    covenant::set_report_policy(ReportPolicy::Immediate);
    let p = Promise::<i32, String>::rejected(&sched, "now".to_string());
    assert_eq!(*seen.lock(), vec![p.id()]);
    covenant::set_report_policy(ReportPolicy::Deferred);

    covenant::take_unhandled_rejection_hook();
}
