//! Contains the [`Handler`] trait through which every phase reports its diagnostics.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    PoisonError, RwLock, RwLockReadGuard,
};

/// Represents a trait responsible for receiving the diagnostics reported by a phase.
pub trait Handler<T> {
    /// Receives a diagnostic and handles it.
    fn receive(&self, diagnostic: T);
}

impl<T, H: Handler<T> + ?Sized> Handler<T> for &H {
    fn receive(&self, diagnostic: T) { (**self).receive(diagnostic); }
}

/// Is a struct that implements [`Handler`] trait by storing all diagnostics in a vector.
#[derive(Debug)]
pub struct Storage<T: Send + Sync> {
    diagnostics: RwLock<Vec<T>>,
}

impl<T: Send + Sync> Storage<T> {
    /// Creates a new empty [`Storage`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            diagnostics: RwLock::new(Vec::new()),
        }
    }

    /// Consumes the [`Storage`] and returns the underlying vector of diagnostics.
    pub fn into_vec(self) -> Vec<T> {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a reference to the underlying vector of diagnostics.
    pub fn as_vec(&self) -> RwLockReadGuard<Vec<T>> {
        self.diagnostics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + Sync> Default for Storage<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send + Sync, U> Handler<U> for Storage<T>
where
    U: Into<T>,
{
    fn receive(&self, diagnostic: U) {
        self.diagnostics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.into());
    }
}

/// Is a struct that implements [`Handler`] trait by doing nothing with the diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dummy;

impl<T> Handler<T> for Dummy {
    fn receive(&self, _diagnostic: T) {}
}

/// Is a struct that implements [`Handler`] trait by counting the number of diagnostics received.
#[derive(Debug, Default)]
pub struct Counter {
    counter: AtomicUsize,
}

impl Counter {
    /// Returns the number of diagnostics received.
    #[must_use]
    pub fn count(&self) -> usize { self.counter.load(Ordering::Relaxed) }

    /// Resets the counter to zero.
    pub fn reset(&self) { self.counter.store(0, Ordering::Relaxed); }
}

impl<T> Handler<T> for Counter {
    fn receive(&self, _diagnostic: T) { self.counter.fetch_add(1, Ordering::Relaxed); }
}

#[cfg(test)]
mod tests {
    use super::{Counter, Handler, Storage};

    #[test]
    fn test_storage_keeps_order() {
        let storage: Storage<String> = Storage::new();
        storage.receive("first");
        storage.receive("second");

        assert_eq!(storage.as_vec().len(), 2);
        assert_eq!(storage.into_vec(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_counter_through_reference() {
        let counter = Counter::default();
        let handler: &dyn Handler<u8> = &counter;

        handler.receive(1);
        handler.receive(2);
        assert_eq!(counter.count(), 2);

        counter.reset();
        assert_eq!(counter.count(), 0);
    }
}
