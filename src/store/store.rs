use super::{Listener, ListenerRegistry, Observable, Subscription, Writable};
use crate::error::StoreError;
use parking_lot::{ReentrantMutex, RwLock};
use std::fmt;
use std::sync::Arc;

/// A thread-safe observable state container.
///
/// Every write notifies listeners synchronously, on the writing thread, with
/// the new and the previous value. Writes from different threads are
/// dispatched one at a time, so listeners see changes in the order they were
/// committed. The state lock is released before listeners run and the
/// dispatch lock is reentrant: a listener may read or write the store again.
pub struct Store<T> {
    state: Arc<RwLock<T>>,
    listeners: Arc<ListenerRegistry<T>>,
    dispatch: Arc<ReentrantMutex<()>>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            listeners: Arc::new(ListenerRegistry::new()),
            dispatch: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Get a clone of the current state.
    pub fn get_state(&self) -> T {
        self.state.read().clone()
    }

    /// Replace the state and notify listeners.
    pub fn set_state(&self, new_state: T) {
        let _dispatch = self.dispatch.lock();
        let prev = {
            let mut state = self.state.write();
            std::mem::replace(&mut *state, new_state.clone())
        };
        self.listeners.notify(&new_state, &prev);
    }

    /// Update part of the state in place and notify listeners.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let _dispatch = self.dispatch.lock();
        let (new_state, prev) = {
            let mut state = self.state.write();
            let prev = state.clone();
            f(&mut *state);
            (state.clone(), prev)
        };
        self.listeners.notify(&new_state, &prev);
    }

    /// Subscribe to state changes.
    ///
    /// The callback receives `(new_state, prev_state)` after every write.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.listeners.subscribe(Arc::new(callback))
    }

    /// Read state without cloning.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.state.read();
        f(&*state)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: Clone + Send + Sync + 'static> Observable for Store<T> {
    type State = T;

    fn get_state(&self) -> T {
        self.state.read().clone()
    }

    fn add_listener(&self, listener: Listener<T>) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

impl<T: Clone + Send + Sync + 'static> Writable for Store<T> {
    fn set_state(&self, state: T) -> Result<(), StoreError> {
        Store::set_state(self, state);
        Ok(())
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            listeners: Arc::clone(&self.listeners),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
