#![cfg(test)]

// State-machine invariants, driven on the deterministic queue scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Promise, QueueScheduler, Rejection, SchedulerRef, State, ThreadScheduler};

fn lab() -> (Arc<QueueScheduler>, SchedulerRef) {
    let queue = Arc::new(QueueScheduler::new());
    let sched: SchedulerRef = queue.clone();
    (queue, sched)
}

#[test]
fn first_settlement_wins() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::pending(&sched);
    p.resolve(Ok(1));
    p.resolve(Ok(2));
    p.reject("late".to_string());
    queue.run_until_idle();
    assert_eq!(p.try_result(), Some(Ok(1)));
}

#[test]
fn rejection_wins_over_later_resolve() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::pending(&sched);
    p.reject("boom".to_string());
    p.resolve(Ok(5));
    queue.run_until_idle();
    assert_eq!(
        p.try_result(),
        Some(Err(Rejection::Rejected("boom".to_string())))
    );
}

#[test]
fn reactions_fire_in_registration_order() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::pending(&sched);
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in 0..3 {
        let log = Arc::clone(&log);
        p.then(move |v| {
            log.lock().push(tag);
            Ok(v)
        });
    }
    p.resolve(Ok(0));
    queue.run_until_idle();
    assert_eq!(*log.lock(), vec![0, 1, 2]);
}

#[test]
fn delivery_is_never_inline() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::resolved(&sched, Ok(1));
    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    p.then(move |v| {
        flag.store(true, Ordering::SeqCst);
        Ok(v)
    });
    // Registered on an already-settled promise, yet nothing runs until the
    // scheduler turns.
    assert!(!fired.load(Ordering::SeqCst));
    queue.run_until_idle();
    assert!(fired.load(Ordering::SeqCst));
}

#[test]
fn rejection_passes_through_then() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::rejected(&sched, "e".to_string()).then(|v| Ok(v));
    queue.run_until_idle();
    assert_eq!(
        p.try_result(),
        Some(Err(Rejection::Rejected("e".to_string())))
    );
}

#[test]
fn fulfillment_passes_through_catch() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::resolved(&sched, Ok(7)).catch(|reason| Err(reason.to_string()));
    queue.run_until_idle();
    assert_eq!(p.try_result(), Some(Ok(7)));
}

#[test]
fn catch_recovers_a_rejection() {
    let (queue, sched) = lab();
    let p = Promise::<usize, String>::rejected(&sched, "e".to_string())
        .catch(|reason| Ok(reason.error().map_or(0, |e| e.len())));
    queue.run_until_idle();
    assert_eq!(p.try_result(), Some(Ok(1)));
}

#[test]
fn from_result_settles_both_ways() {
    let (queue, sched) = lab();
    let ok = Promise::<i32, String>::from_result(&sched, Ok(1));
    let err = Promise::<i32, String>::from_result(&sched, Err("e".to_string()));
    queue.run_until_idle();
    assert_eq!(ok.try_result(), Some(Ok(1)));
    assert_eq!(
        err.try_result(),
        Some(Err(Rejection::Rejected("e".to_string())))
    );
}

#[test]
fn turn_runs_one_scheduler_turn_at_a_time() {
    let (queue, sched) = lab();
    let first = Promise::<i32, String>::resolved(&sched, Ok(1)).then(|v| Ok(v + 1));
    let second = first.then(|v| Ok(v * 2));
    queue.turn();
    assert_eq!(first.try_result(), Some(Ok(2)));
    assert_eq!(second.try_result(), None);
    queue.turn();
    assert_eq!(second.try_result(), Some(Ok(4)));
}

#[test]
fn panicking_handler_rejects_the_child() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::resolved(&sched, Ok(1))
        .then(|_| -> Result<i32, String> { panic!("kaboom") });
    queue.run_until_idle();
    match p.try_result() {
        Some(Err(Rejection::Panicked(message))) => assert!(message.contains("kaboom")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    // The scheduler survives the panic.
    let ok = Promise::<i32, String>::resolved(&sched, Ok(2)).then(|v| Ok(v + 1));
    queue.run_until_idle();
    assert_eq!(ok.try_result(), Some(Ok(3)));
}

#[test]
fn settled_promises_ignore_cancel() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::resolved(&sched, Ok(1));
    assert_eq!(p.state(), State::Fulfilled);
    assert!(!p.cancel());
    queue.run_until_idle();
    assert_eq!(p.try_result(), Some(Ok(1)));
}

#[test]
fn cancel_rejects_a_pending_promise() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::pending(&sched);
    assert_eq!(p.state(), State::Pending);
    assert!(p.cancel());
    assert!(!p.cancel());
    queue.run_until_idle();
    assert_eq!(p.try_result(), Some(Err(Rejection::Cancelled)));
}

#[test]
fn map_transforms_only_the_value() {
    let (queue, sched) = lab();
    let doubled = Promise::<i32, String>::resolved(&sched, Ok(3)).map(|v| Ok(v * 2));
    let skipped = Promise::<i32, String>::rejected(&sched, "e".to_string()).map(|v| Ok(v * 2));
    queue.run_until_idle();
    assert_eq!(doubled.try_result(), Some(Ok(6)));
    assert_eq!(
        skipped.try_result(),
        Some(Err(Rejection::Rejected("e".to_string())))
    );
}

#[test]
fn map_err_transforms_only_the_error() {
    let (queue, sched) = lab();
    let mapped = Promise::<i32, String>::rejected(&sched, "fail".to_string())
        .map_err(|e| Err(format!("error: {e}")));
    let passed = Promise::<i32, String>::resolved(&sched, Ok(5)).map_err(|e| Err(format!("{e}!")));
    queue.run_until_idle();
    assert_eq!(
        mapped.try_result(),
        Some(Err(Rejection::Rejected("error: fail".to_string())))
    );
    assert_eq!(passed.try_result(), Some(Ok(5)));
}

#[test]
fn map_err_keeps_machinery_rejections() {
    let (queue, sched) = lab();
    let p = Promise::<i32, String>::pending(&sched);
    p.cancel();
    let mapped = p.map_err(|e| Err(e.len()));
    queue.run_until_idle();
    assert_eq!(mapped.try_result(), Some(Err(Rejection::Cancelled)));
}

#[test]
fn wait_blocks_until_settlement() {
    let sched: SchedulerRef = Arc::new(ThreadScheduler::new());
    let p = Promise::<i32, String>::new(&sched, || Ok(20)).then(|v| Ok(v + 2));
    assert_eq!(p.wait(), Ok(22));
}

#[test]
fn panicking_producer_rejects() {
    let sched: SchedulerRef = Arc::new(ThreadScheduler::new());
    let p =
        Promise::<i32, String>::new(&sched, || -> Result<i32, String> { panic!("producer died") });
    match p.wait() {
        Err(Rejection::Panicked(message)) => assert!(message.contains("producer died")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
