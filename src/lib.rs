//!
//! # Promises for Rust, scheduled onto your event loop
//!
//! This crate provides a JavaScript-inspired, single-assignment Promise type
//! for Rust: an asynchronous result container supporting chaining with
//! `then`, recovery with `catch`, combinators, and settlement against an
//! external scheduler of your choosing.
//!
//! ## Features
//! - A strict settlement state machine: a promise settles at most once, and
//!   every registered reaction is delivered exactly once, in registration
//!   order, always asynchronously
//! - A resolution procedure that flattens nested promises and absorbs
//!   foreign [`Thenable`] values, with cycle detection
//! - Combinators: [`Promise::all`], [`Promise::race`]
//! - Pluggable scheduling through the [`Scheduler`] trait, with a
//!   deterministic [`QueueScheduler`] and a background [`ThreadScheduler`]
//!   included
//! - Panic-safe: panics in producers and handlers become rejections
//! - An unhandled-rejection hook, so lost failures are never silent
//!
//! ## Example
//! ```
//! use covenant::{Promise, QueueScheduler, SchedulerRef};
//! use std::sync::Arc;
//!
//! let queue = Arc::new(QueueScheduler::new());
//! let sched: SchedulerRef = queue.clone();
//!
//! let p = Promise::<i32, String>::resolved(&sched, Ok(2))
//!     .then(|v| Ok(v * 10))
//!     .then(|v| Ok(v + 5));
//! queue.run_until_idle();
//! assert_eq!(p.try_result(), Some(Ok(25)));
//! ```
//!
//! ## Error Handling
//! Failures flow through [`Rejection`]: domain payloads are carried as-is,
//! while handler panics, resolution cycles, and cancellations are tagged
//! variants of their own. A rejection crossing a `then` boundary passes
//! through to the child untouched; only a `catch` handler can convert it
//! back into a value.
//!
//! ## See Also
//! - [`Promise`] for the main type
//! - [`Scheduler`] for wiring the library to a host runtime
//! - [`set_unhandled_rejection_hook`] for the diagnostic surface

#![warn(missing_docs)]

mod combinator;
mod diagnostics;
mod error;
mod promise;
mod resolution;
mod scheduler;
mod thenable;

#[cfg(test)]
mod tests;

pub use diagnostics::{
    set_report_policy, set_unhandled_rejection_hook, take_unhandled_rejection_hook, ReportPolicy,
    UnhandledRejection, UnhandledRejectionHook,
};
pub use error::{Rejection, Settled};
pub use promise::{Promise, State};
pub use resolution::Resolution;
pub use scheduler::{Job, QueueScheduler, Scheduler, SchedulerRef, Task, ThreadScheduler};
pub use thenable::{RejectFn, ResolveFn, Thenable};
