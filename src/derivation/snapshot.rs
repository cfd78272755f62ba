use crate::store::Observable;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Ordered values of every input store, in declaration order.
///
/// A snapshot is immutable once built. Advancing it produces a new snapshot
/// and leaves the one already handed out untouched, so a combine function can
/// keep both the current and the previous snapshot around cheaply.
pub struct Snapshot<V> {
    values: Arc<[V]>,
}

impl<V: Clone> Snapshot<V> {
    /// Read every input's current value, in order.
    pub fn capture_initial<S>(inputs: &[S]) -> Self
    where
        S: Observable<State = V>,
    {
        inputs.iter().map(Observable::get_state).collect()
    }

    /// A copy of this snapshot with position `index` set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn with_replaced_index(&self, index: usize, value: V) -> Self {
        let mut values = self.values.to_vec();
        values[index] = value;
        Self {
            values: values.into(),
        }
    }
}

impl<V> Snapshot<V> {
    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the derivation has no inputs.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values as a slice.
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }

    /// Whether both snapshots are the same published sequence.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl<V> Clone for Snapshot<V> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

impl<V> Deref for Snapshot<V> {
    type Target = [V];

    fn deref(&self) -> &[V] {
        &self.values
    }
}

impl<V> FromIterator<V> for Snapshot<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<V> From<Vec<V>> for Snapshot<V> {
    fn from(values: Vec<V>) -> Self {
        Self {
            values: values.into(),
        }
    }
}

impl<V: PartialEq> PartialEq for Snapshot<V> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<V: Eq> Eq for Snapshot<V> {}

impl<V: fmt::Debug> fmt::Debug for Snapshot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}
