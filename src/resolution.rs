//! The candidate-value taxonomy consumed by the resolution procedure.

use std::fmt;

use crate::promise::Promise;
use crate::thenable::Thenable;

/// A candidate settlement value.
///
/// Whenever a promise is resolved (directly, from a producer's return, or
/// from a handler's return) the candidate is classified into one of these
/// variants and the resolution procedure dispatches on the tag: plain
/// values fulfill, promises are adopted, thenables are absorbed, errors
/// reject. This guarantees a promise never stores another promise as its
/// value.
///
/// Handlers rarely name this type: `Result<T, E>` and `Promise<T, E>`
/// convert into it, so `|v| Ok(v * 2)` and `|v| other_lookup(v)` both work
/// as handler bodies.
pub enum Resolution<T, E> {
    /// A plain, final value; fulfills directly.
    Value(T),
    /// A native promise; the resolving promise adopts its eventual state.
    Promise(Promise<T, E>),
    /// A foreign thenable to absorb.
    Foreign(Box<dyn Thenable<T, E>>),
    /// A domain error; rejects directly.
    Error(E),
}

impl<T, E> Resolution<T, E> {
    /// Wraps a foreign thenable.
    pub fn foreign(thenable: impl Thenable<T, E> + 'static) -> Self {
        Self::Foreign(Box::new(thenable))
    }
}

impl<T, E> From<Result<T, E>> for Resolution<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(error) => Self::Error(error),
        }
    }
}

impl<T, E> From<Promise<T, E>> for Resolution<T, E> {
    fn from(promise: Promise<T, E>) -> Self {
        Self::Promise(promise)
    }
}

impl<T, E> From<Box<dyn Thenable<T, E>>> for Resolution<T, E> {
    fn from(thenable: Box<dyn Thenable<T, E>>) -> Self {
        Self::Foreign(thenable)
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Promise(promise) => f.debug_tuple("Promise").field(promise).finish(),
            Self::Foreign(_) => f.write_str("Foreign(..)"),
            Self::Error(error) => f.debug_tuple("Error").field(error).finish(),
        }
    }
}
