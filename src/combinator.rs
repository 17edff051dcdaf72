//! Combinators over collections of promises.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::promise::Promise;
use crate::scheduler::SchedulerRef;

struct AllState<T, E> {
    child: Promise<Vec<T>, E>,
    slots: Vec<Option<T>>,
    remaining: usize,
    done: bool,
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + fmt::Debug + Send + 'static,
{
    /// Fulfills with the ordered results of every input once all of them
    /// fulfill, or rejects with the first rejection observed. Remaining
    /// inputs still settle, but their outcomes are discarded. An empty
    /// input fulfills with an empty vector.
    ///
    /// # Example
    /// ```
    /// use covenant::{Promise, QueueScheduler, SchedulerRef};
    /// use std::sync::Arc;
    ///
    /// let queue = Arc::new(QueueScheduler::new());
    /// let sched: SchedulerRef = queue.clone();
    ///
    /// let all = Promise::all(&sched, vec![
    ///     Promise::<i32, String>::resolved(&sched, Ok(1)),
    ///     Promise::resolved(&sched, Ok(2)),
    ///     Promise::resolved(&sched, Ok(3)),
    /// ]);
    /// queue.run_until_idle();
    /// assert_eq!(all.try_result(), Some(Ok(vec![1, 2, 3])));
    /// ```
    pub fn all(
        sched: &SchedulerRef,
        promises: impl IntoIterator<Item = Promise<T, E>>,
    ) -> Promise<Vec<T>, E> {
        let inputs: Vec<_> = promises.into_iter().collect();
        let child = Promise::pending(sched);
        if inputs.is_empty() {
            child.resolve(Ok(Vec::new()));
            return child;
        }
        let state = Arc::new(Mutex::new(AllState {
            child: child.clone(),
            slots: (0..inputs.len()).map(|_| None).collect(),
            remaining: inputs.len(),
            done: false,
        }));
        for (index, promise) in inputs.into_iter().enumerate() {
            let state = Arc::clone(&state);
            promise.subscribe(Box::new(move |settled| {
                let mut all = state.lock();
                if all.done {
                    return;
                }
                match settled {
                    Ok(value) => {
                        if all.slots[index].is_none() {
                            all.slots[index] = Some(value);
                            all.remaining -= 1;
                        }
                        if all.remaining == 0 {
                            all.done = true;
                            let results: Vec<T> =
                                all.slots.iter_mut().filter_map(Option::take).collect();
                            let target = all.child.clone();
                            drop(all);
                            target.settle_fulfilled(results);
                        }
                    }
                    Err(reason) => {
                        all.done = true;
                        let target = all.child.clone();
                        drop(all);
                        target.settle_rejected(reason);
                    }
                }
            }));
        }
        child
    }

    /// Settles with the first input to settle, in either direction. An
    /// empty input stays pending forever.
    ///
    /// # Example
    /// ```
    /// use covenant::{Promise, QueueScheduler, SchedulerRef};
    /// use std::sync::Arc;
    ///
    /// let queue = Arc::new(QueueScheduler::new());
    /// let sched: SchedulerRef = queue.clone();
    ///
    /// let never = Promise::<i32, String>::pending(&sched);
    /// let quick = Promise::resolved(&sched, Ok(7));
    /// let race = Promise::race(&sched, [never, quick]);
    /// queue.run_until_idle();
    /// assert_eq!(race.try_result(), Some(Ok(7)));
    /// ```
    pub fn race(
        sched: &SchedulerRef,
        promises: impl IntoIterator<Item = Promise<T, E>>,
    ) -> Promise<T, E> {
        let child = Promise::pending(sched);
        for promise in promises {
            let target = child.clone();
            // First settlement wins; the rest land on the single-settlement
            // guard and are dropped.
            promise.subscribe(Box::new(move |settled| match settled {
                Ok(value) => {
                    target.settle_fulfilled(value);
                }
                Err(reason) => {
                    target.settle_rejected(reason);
                }
            }));
        }
        child
    }
}
