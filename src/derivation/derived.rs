use super::engine::DerivationEngine;
use super::{DeriveOptions, Snapshot};
use crate::error::StoreError;
use crate::store::{Listener, Observable, Subscription, Writable};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A read-only store whose state is computed from other stores.
///
/// Built by [`derive`] or [`derive_with`]. Every change of an input store
/// recomputes the state with the combine function and notifies this store's
/// listeners with `(new_state, prev_state)`, synchronously, on the thread
/// that changed the input. There is no equality check: a recomputation that
/// yields an equal value still notifies.
///
/// Handles are cheap to clone and share the same state. Once the last handle
/// is dropped the input subscriptions are released.
///
/// # Examples
///
/// ```
/// use tincan_derive::{derive, Store};
///
/// let a = Store::new(1);
/// let b = Store::new(2);
/// let sum = derive(&[&a, &b], |values, _, _| values.iter().sum::<i32>());
/// assert_eq!(sum.get_state(), 3);
///
/// a.set_state(5);
/// assert_eq!(sum.get_state(), 7);
/// ```
pub struct DerivedStore<V, T> {
    engine: Arc<DerivationEngine<V, T>>,
}

impl<V, T> DerivedStore<V, T>
where
    V: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Current derived state.
    pub fn get_state(&self) -> T {
        self.engine.state()
    }

    /// Read the derived state without cloning.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.engine.read(f)
    }

    /// Subscribe to recomputations.
    ///
    /// The callback receives `(new_state, prev_state)`. Listeners run in
    /// subscription order.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.engine.subscribe(Arc::new(callback))
    }

    /// Always fails: a derived store is only written by its combine function.
    pub fn set_state(&self, _state: T) -> Result<(), StoreError> {
        Err(StoreError::UnsupportedOperation {
            operation: "set_state",
        })
    }

    /// Stop following the input stores.
    ///
    /// The state is frozen at its last value. Listeners stay subscribed but
    /// will not be called again. Calling this more than once is a no-op.
    pub fn destroy(&self) {
        self.engine.destroy();
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.engine.is_destroyed()
    }

    /// Derived state before the latest recomputation, if any happened.
    pub fn prev_state(&self) -> Option<T> {
        self.engine.prev_state()
    }

    /// Input values the current state was computed from.
    pub fn snapshot(&self) -> Snapshot<V> {
        self.engine.snapshot()
    }

    /// Input values before the latest recomputation, if any happened.
    pub fn prev_snapshot(&self) -> Option<Snapshot<V>> {
        self.engine.prev_snapshot()
    }

    /// Number of input stores.
    pub fn input_count(&self) -> usize {
        self.engine.snapshot().len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.engine.listener_count()
    }

    /// Label given in [`DeriveOptions`].
    pub fn label(&self) -> Option<&str> {
        self.engine.label()
    }
}

impl<V, T> Observable for DerivedStore<V, T>
where
    V: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    type State = T;

    fn get_state(&self) -> T {
        self.engine.state()
    }

    fn add_listener(&self, listener: Listener<T>) -> Subscription {
        self.engine.subscribe(listener)
    }
}

impl<V, T> Writable for DerivedStore<V, T>
where
    V: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn set_state(&self, state: T) -> Result<(), StoreError> {
        DerivedStore::set_state(self, state)
    }
}

impl<V, T> Clone for DerivedStore<V, T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<V, T> fmt::Debug for DerivedStore<V, T>
where
    V: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedStore")
            .field("label", &self.label())
            .field("state", &self.get_state())
            .field("inputs", &self.input_count())
            .field("listeners", &self.listener_count())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Create a store derived from `inputs`.
///
/// `combine` is called with `(snapshot, prev_snapshot, prev_state)`: once
/// right away with no history, then after every change of any input. The
/// snapshot holds one value per input, in the order of `inputs`.
///
/// A panic in `combine` propagates to the caller: out of this function for
/// the initial computation, out of the input store's write call afterwards.
/// The derived store keeps its last state in that case.
///
/// Writing back into an input from `combine` or from a listener re-enters
/// the derivation before the outer recomputation finishes. Nothing guards
/// against cycles.
pub fn derive<S, T, F>(inputs: &[S], combine: F) -> DerivedStore<S::State, T>
where
    S: Observable,
    T: Clone + Send + Sync + 'static,
    F: Fn(&Snapshot<S::State>, Option<&Snapshot<S::State>>, Option<&T>) -> T
        + Send
        + Sync
        + 'static,
{
    derive_with(DeriveOptions::default(), inputs, combine)
}

/// [`derive`] with explicit [`DeriveOptions`].
pub fn derive_with<S, T, F>(
    options: DeriveOptions,
    inputs: &[S],
    combine: F,
) -> DerivedStore<S::State, T>
where
    S: Observable,
    T: Clone + Send + Sync + 'static,
    F: Fn(&Snapshot<S::State>, Option<&Snapshot<S::State>>, Option<&T>) -> T
        + Send
        + Sync
        + 'static,
{
    // Baseline first, so no input change can land before it.
    let snapshot = Snapshot::capture_initial(inputs);
    let engine = Arc::new(DerivationEngine::new(options, snapshot, combine));

    let subscriptions = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            let engine = Arc::downgrade(&engine);
            input.add_listener(Arc::new(move |value: &S::State, _prev: &S::State| {
                if let Some(engine) = engine.upgrade() {
                    engine.on_input_change(index, value.clone());
                }
            }))
        })
        .collect();
    engine.attach(subscriptions);

    debug!(label = ?engine.label(), inputs = inputs.len(), "derived store created");
    DerivedStore { engine }
}
