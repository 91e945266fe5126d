//! Latest-value collection for entity properties.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::entity::Entity;

/// Shared map from slot index to the latest decoded value of that slot.
///
/// Clones share the same underlying map.
pub struct PropertySnapshot<V> {
    values: Arc<Mutex<BTreeMap<usize, V>>>,
}

impl<V> PropertySnapshot<V> {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Number of slots that have received a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Returns `true` if no slot has received a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    /// Runs `f` with the current map.
    pub fn with<R>(&self, f: impl FnOnce(&BTreeMap<usize, V>) -> R) -> R {
        f(&self.values.lock())
    }

    /// Forgets every stored value.
    pub fn clear(&self) {
        self.values.lock().clear();
    }
}

impl<V: Clone> PropertySnapshot<V> {
    /// Latest value of `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<V> {
        self.values.lock().get(&slot).cloned()
    }

    /// Copies the current map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<usize, V> {
        self.values.lock().clone()
    }
}

impl<V> Clone for PropertySnapshot<V> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

impl<V> Default for PropertySnapshot<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for PropertySnapshot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.lock().iter()).finish()
    }
}

/// Writes one slot's values into a snapshot; one recorder per property.
struct SlotRecorder<V> {
    slot: usize,
    values: Arc<Mutex<BTreeMap<usize, V>>>,
}

impl<V: Clone> SlotRecorder<V> {
    fn record(&self, value: &V) {
        self.values.lock().insert(self.slot, value.clone());
    }
}

/// Registers one handler per property of `entity` that stores every decoded
/// value in `snapshot` under that property's slot index.
///
/// Additive: calling it again registers another set of handlers.
pub fn collect_properties<V>(entity: &mut Entity<V>, snapshot: &PropertySnapshot<V>)
where
    V: Clone + Send + 'static,
{
    for property in entity.properties_mut() {
        let recorder = SlotRecorder {
            slot: property.index(),
            values: Arc::clone(&snapshot.values),
        };
        property.register_update_handler(move |value| recorder.record(value));
    }
}
