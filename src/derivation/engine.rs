use super::{DeriveOptions, Snapshot};
use crate::store::{Listener, ListenerRegistry, Subscription};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// User function turning the input snapshot into derived state.
///
/// Called with `(snapshot, prev_snapshot, prev_state)`.
pub(crate) type Combine<V, T> =
    dyn Fn(&Snapshot<V>, Option<&Snapshot<V>>, Option<&T>) -> T + Send + Sync;

/// Everything a transition replaces, as one unit.
struct AggregateRecord<V, T> {
    snapshot: Snapshot<V>,
    prev_snapshot: Option<Snapshot<V>>,
    state: T,
    prev_state: Option<T>,
}

/// Shared core of a derived store.
///
/// Input listeners hold this weakly; the [`DerivedStore`](super::DerivedStore)
/// handles hold it strongly.
pub(crate) struct DerivationEngine<V, T> {
    label: Option<String>,
    combine: Box<Combine<V, T>>,
    record: RwLock<AggregateRecord<V, T>>,
    listeners: Arc<ListenerRegistry<T>>,
    inputs: Mutex<Vec<Subscription>>,
    // Held for a whole transition, listener dispatch included. Reentrant: a write-back
    // into an input from the same thread recurses into `on_input_change`.
    transition: ReentrantMutex<()>,
    destroyed: AtomicBool,
}

impl<V, T> DerivationEngine<V, T>
where
    V: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Run the initial combine over `snapshot`.
    ///
    /// A panic in `combine` unwinds out of here and no engine is built.
    pub(crate) fn new<F>(options: DeriveOptions, snapshot: Snapshot<V>, combine: F) -> Self
    where
        F: Fn(&Snapshot<V>, Option<&Snapshot<V>>, Option<&T>) -> T + Send + Sync + 'static,
    {
        let state = combine(&snapshot, None, None);
        Self {
            label: options.label,
            combine: Box::new(combine),
            record: RwLock::new(AggregateRecord {
                snapshot,
                prev_snapshot: None,
                state,
                prev_state: None,
            }),
            listeners: Arc::new(ListenerRegistry::new()),
            inputs: Mutex::new(Vec::new()),
            transition: ReentrantMutex::new(()),
            destroyed: AtomicBool::new(false),
        }
    }

    /// Take ownership of the input subscriptions.
    pub(crate) fn attach(&self, subscriptions: Vec<Subscription>) {
        self.inputs.lock().extend(subscriptions);
    }

    /// Advance the record after input `index` changed to `value`, then
    /// notify listeners with `(new_state, prev_state)`.
    ///
    /// If `combine` panics the record keeps its pre-event values and no
    /// listener runs.
    pub(crate) fn on_input_change(&self, index: usize, value: V) {
        if self.is_destroyed() {
            return;
        }
        let _transition = self.transition.lock();
        // `destroy` may have run while this change waited for the lock.
        if self.is_destroyed() {
            return;
        }

        let (current, prev_state) = {
            let record = self.record.read();
            (record.snapshot.clone(), record.state.clone())
        };
        let next = current.with_replaced_index(index, value);
        let state = (self.combine)(&next, Some(&current), Some(&prev_state));

        {
            let mut record = self.record.write();
            record.prev_snapshot = Some(current);
            record.snapshot = next;
            record.prev_state = Some(prev_state.clone());
            record.state = state.clone();
        }

        trace!(
            label = ?self.label,
            input = index,
            listeners = self.listeners.len(),
            "derived state recomputed"
        );
        self.listeners.notify(&state, &prev_state);
    }

    /// Release every input subscription. Listeners stay registered.
    pub(crate) fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        let inputs = std::mem::take(&mut *self.inputs.lock());
        debug!(label = ?self.label, inputs = inputs.len(), "derived store destroyed");
        drop(inputs);
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub(crate) fn subscribe(&self, listener: Listener<T>) -> Subscription {
        let id = self.listeners.add(listener);
        trace!(label = ?self.label, listeners = self.listeners.len(), "listener added");

        let registry = Arc::downgrade(&self.listeners);
        let label = self.label.clone();
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                if registry.remove(id) {
                    trace!(label = ?label, listeners = registry.len(), "listener removed");
                }
            }
        })
    }

    pub(crate) fn state(&self) -> T {
        self.record.read().state.clone()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.record.read().state)
    }

    pub(crate) fn prev_state(&self) -> Option<T> {
        self.record.read().prev_state.clone()
    }

    pub(crate) fn snapshot(&self) -> Snapshot<V> {
        self.record.read().snapshot.clone()
    }

    pub(crate) fn prev_snapshot(&self) -> Option<Snapshot<V>> {
        self.record.read().prev_snapshot.clone()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
