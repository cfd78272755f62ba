use super::{Listener, Subscription};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of a registered listener within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Ordered set of change listeners.
///
/// Listeners are notified in insertion order. Removal is by [`ListenerId`],
/// so registering the same closure twice yields two independent entries.
pub struct ListenerRegistry<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Listener<T>)>>,
}

impl<T> ListenerRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append a listener and return its identity.
    pub fn add(&self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.entries.lock().push((id, listener));
        id
    }

    /// Remove exactly the listener registered under `id`.
    ///
    /// Returns `false` if it was already removed.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Call every registered listener, in insertion order.
    ///
    /// The listener list is copied before dispatch and no lock is held while
    /// listeners run: a listener may subscribe or unsubscribe (itself or
    /// others) and the change only applies to the next notification.
    pub fn notify(&self, new_state: &T, prev_state: &T) {
        let listeners: Vec<Listener<T>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(new_state, prev_state);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<T: 'static> ListenerRegistry<T> {
    /// Add a listener and wrap its removal in a [`Subscription`].
    ///
    /// The subscription only holds a weak reference to the registry, so it
    /// never keeps a dropped store alive.
    pub fn subscribe(self: &Arc<Self>, listener: Listener<T>) -> Subscription
    where
        T: Send + Sync,
    {
        let id = self.add(listener);
        let registry = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
