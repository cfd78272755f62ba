use super::Subscription;
use crate::error::StoreError;
use std::sync::Arc;

/// A change listener, called with `(new_state, prev_state)`.
pub type Listener<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

/// Read side of an observable store.
///
/// This is the contract a store must satisfy to be used as a derivation
/// input: a synchronous current value and a change feed.
pub trait Observable {
    /// The value held by the store.
    type State: Clone + Send + Sync + 'static;

    /// Current value.
    fn get_state(&self) -> Self::State;

    /// Register a change listener.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or unsubscribed.
    fn add_listener(&self, listener: Listener<Self::State>) -> Subscription;
}

/// Write side of an observable store.
pub trait Writable: Observable {
    /// Replace the current value and notify listeners.
    fn set_state(&self, state: Self::State) -> Result<(), StoreError>;
}

impl<S: Observable + ?Sized> Observable for &S {
    type State = S::State;

    fn get_state(&self) -> Self::State {
        (**self).get_state()
    }

    fn add_listener(&self, listener: Listener<Self::State>) -> Subscription {
        (**self).add_listener(listener)
    }
}

impl<S: Observable + ?Sized> Observable for Arc<S> {
    type State = S::State;

    fn get_state(&self) -> Self::State {
        (**self).get_state()
    }

    fn add_listener(&self, listener: Listener<Self::State>) -> Subscription {
        (**self).add_listener(listener)
    }
}

impl<S: Writable + ?Sized> Writable for &S {
    fn set_state(&self, state: Self::State) -> Result<(), StoreError> {
        (**self).set_state(state)
    }
}

impl<S: Writable + ?Sized> Writable for Arc<S> {
    fn set_state(&self, state: Self::State) -> Result<(), StoreError> {
        (**self).set_state(state)
    }
}
