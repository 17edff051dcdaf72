//! Interop with foreign `then`-shaped values.

use crate::resolution::Resolution;

/// Callback a foreign thenable invokes to forward fulfillment into the
/// adopting promise. It accepts a further [`Resolution`], so a thenable may
/// itself resolve with a promise or another thenable and the unwrapping
/// continues transitively.
pub type ResolveFn<T, E> = Box<dyn FnOnce(Resolution<T, E>) + Send>;

/// Callback a foreign thenable invokes to forward rejection into the
/// adopting promise.
pub type RejectFn<E> = Box<dyn FnOnce(E) + Send>;

/// A foreign value exposing a `then`-shaped capability.
///
/// Values of this kind originate outside the library (a binding layer,
/// another promise implementation) and are absorbed by the resolution
/// procedure instead of being stored as settlement values.
///
/// The contract mirrors the one foreign code is held to everywhere:
/// `then` is invoked at most once, and only the first invocation of either
/// callback settles the adopting promise. Returning `Err` (or panicking)
/// without having invoked a callback rejects the adopting promise.
pub trait Thenable<T, E>: Send {
    /// Wires this value's eventual outcome into the adopting promise.
    fn then(self: Box<Self>, resolve: ResolveFn<T, E>, reject: RejectFn<E>) -> Result<(), E>;
}
