//! Deferred builder values.

use std::fmt;

/// A builder slot: either a value known up front or a callback evaluated
/// when the builder is built.
pub enum Supplied<T> {
    /// Value fixed when the builder was created.
    Ready(T),
    /// Callback registered by a setter.
    Deferred(Box<dyn FnOnce() -> T>),
}

impl<T> Supplied<T> {
    /// Wrap a known value.
    #[must_use]
    pub const fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    /// Wrap a callback. It runs at most once, in [`Self::resolve`].
    #[must_use]
    pub fn deferred<F>(callback: F) -> Self
    where
        F: FnOnce() -> T + 'static,
    {
        Self::Deferred(Box::new(callback))
    }

    /// Produce the value, running the callback if there is one.
    #[must_use]
    pub fn resolve(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Deferred(callback) => callback(),
        }
    }

    /// Whether a callback is pending.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for Supplied<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<T> From<T> for Supplied<T> {
    fn from(value: T) -> Self {
        Self::Ready(value)
    }
}
