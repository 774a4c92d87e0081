//! Abstract operations.

use std::marker::PhantomData;

/// Operation to select a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation to perform a read-only call.
#[derive(Clone, Copy, Debug)]
pub struct Call<T>(pub T);

/// Operation to submit a value for execution without awaiting its outcome.
#[derive(Clone, Copy, Debug)]
pub struct Submit<T>(pub T);

/// Operation to await a durable outcome of a submitted value.
#[derive(Clone, Copy, Debug)]
pub struct Confirm<T>(pub T);

/// Operation to request a value from a third party, which may refuse.
#[derive(Clone, Copy, Debug)]
pub struct Request<T>(pub T);

/// Selector of `W` by `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] with the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Consumes this [`By`] and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
