//! The rejection taxonomy carried by failed promises.

use std::any::Any;

use thiserror::Error;

/// The stored failure of a rejected promise.
///
/// A promise rejects either with the domain payload its producer passed to
/// [`reject`](crate::Promise::reject), or with a failure originating in the
/// chaining machinery itself. Machinery variants carry no domain payload and
/// pass structurally through [`map_err`](crate::Promise::map_err).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection<E> {
    /// The domain-level payload a producer rejected with. Carried as-is and
    /// never unwrapped, even when `E` is itself promise-shaped.
    #[error("rejected: {0:?}")]
    Rejected(E),
    /// The promise was resolved with itself.
    #[error("promise resolved with itself")]
    Cyclic,
    /// A handler, producer, or foreign thenable panicked while running.
    #[error("handler panicked: {0}")]
    Panicked(String),
    /// The promise was cancelled before it settled.
    #[error("cancelled before settlement")]
    Cancelled,
}

impl<E> Rejection<E> {
    /// The domain payload, if this rejection carries one.
    pub fn into_error(self) -> Option<E> {
        match self {
            Self::Rejected(error) => Some(error),
            _ => None,
        }
    }

    /// Borrowing accessor for the domain payload.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Rejected(error) => Some(error),
            _ => None,
        }
    }

    /// Splits the domain payload off from the machinery variants so the
    /// caller can remap it while the rest convert structurally.
    pub(crate) fn retag<E2>(self) -> Result<Rejection<E2>, E> {
        match self {
            Self::Rejected(error) => Err(error),
            Self::Cyclic => Ok(Rejection::Cyclic),
            Self::Panicked(message) => Ok(Rejection::Panicked(message)),
            Self::Cancelled => Ok(Rejection::Cancelled),
        }
    }
}

/// The outcome a reaction receives once its promise settles.
pub type Settled<T, E> = Result<T, Rejection<E>>;

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "opaque panic payload".to_string(),
        },
    }
}
