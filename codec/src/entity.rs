//! Entities, their property tables, and update application.

use std::fmt;
use std::sync::Arc;

use bitstream::BitReader;
use schema::{ClassSchema, PropertyDef};
use tracing::{trace, warn};

use crate::error::{CodecError, CodecResult};
use crate::index::IndexDeltaDecoder;
use crate::pool::UpdateBufferPool;
use crate::types::{EntityId, UpdateStats};
use crate::value::ValueDecoder;

/// Callback invoked with every newly decoded value of one property.
pub type UpdateHandler<V> = Box<dyn FnMut(&V) + Send>;

/// One slot of an entity's property table.
pub struct PropertyEntry<V> {
    index: usize,
    entry: Arc<PropertyDef>,
    handlers: Vec<UpdateHandler<V>>,
}

impl<V> PropertyEntry<V> {
    fn new(entry: Arc<PropertyDef>, index: usize) -> Self {
        Self {
            index,
            entry,
            handlers: Vec::new(),
        }
    }

    /// Slot index of this property, equal to its position in the class schema.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Schema definition of this property.
    #[must_use]
    pub fn entry(&self) -> &PropertyDef {
        &self.entry
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Number of registered update handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Registers a handler; handlers fire in registration order.
    ///
    /// A handler must not apply another update to the entity owning this
    /// property while it runs.
    pub fn register_update_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&V) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Invokes every registered handler with `value`.
    pub fn fire_update(&mut self, value: &V) {
        for handler in &mut self.handlers {
            handler(value);
        }
    }
}

impl<V> fmt::Debug for PropertyEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyEntry")
            .field("index", &self.index)
            .field("name", &self.entry.name)
            .field("kind", &self.entry.kind)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// A live networked entity.
///
/// The property table mirrors the class schema one to one, in slot order, for
/// the entity's whole lifetime. Values are not stored here; they reach the
/// outside world only through update handlers (see
/// [`collect_properties`](crate::collect_properties) for a value store).
pub struct Entity<V> {
    id: EntityId,
    class: Arc<ClassSchema>,
    properties: Vec<PropertyEntry<V>>,
}

impl<V> Entity<V> {
    /// Creates an entity of `class` with an empty handler list on every property.
    #[must_use]
    pub fn new(id: EntityId, class: Arc<ClassSchema>) -> Self {
        if class.collides_with_sentinel() {
            warn!(
                entity = %id,
                class = %class.name,
                properties = class.len(),
                "class is too large for unambiguous slot indices"
            );
        }
        let properties = class
            .properties
            .iter()
            .enumerate()
            .map(|(index, entry)| PropertyEntry::new(Arc::clone(entry), index))
            .collect();
        Self {
            id,
            class,
            properties,
        }
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Class schema shared with every other entity of the same class.
    #[must_use]
    pub fn class(&self) -> &Arc<ClassSchema> {
        &self.class
    }

    /// The property table in slot order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyEntry<V>] {
        &self.properties
    }

    /// The property table in slot order, for registering handlers.
    pub fn properties_mut(&mut self) -> &mut [PropertyEntry<V>] {
        &mut self.properties
    }

    /// Returns the property at `index`.
    #[must_use]
    pub fn property(&self, index: usize) -> Option<&PropertyEntry<V>> {
        self.properties.get(index)
    }

    /// Returns the property at `index` mutably.
    pub fn property_mut(&mut self, index: usize) -> Option<&mut PropertyEntry<V>> {
        self.properties.get_mut(index)
    }

    /// Finds the single property called `name`.
    ///
    /// A missing name or a name used by more than one slot is an error; both
    /// point at a schema or caller defect.
    pub fn find_property(&self, name: &str) -> CodecResult<&PropertyEntry<V>> {
        let slot = self.find_slot(name)?;
        Ok(&self.properties[slot])
    }

    /// Finds the single property called `name` mutably.
    pub fn find_property_mut(&mut self, name: &str) -> CodecResult<&mut PropertyEntry<V>> {
        let slot = self.find_slot(name)?;
        Ok(&mut self.properties[slot])
    }

    fn find_slot(&self, name: &str) -> CodecResult<usize> {
        let mut found: Option<usize> = None;
        for (slot, property) in self.properties.iter().enumerate() {
            if property.entry.name != name {
                continue;
            }
            if let Some(first) = found {
                return Err(CodecError::DuplicatePropertyName {
                    entity_id: self.id.raw(),
                    name: name.to_string(),
                    first,
                    second: slot,
                });
            }
            found = Some(slot);
        }
        found.ok_or_else(|| CodecError::PropertyNotFound {
            entity_id: self.id.raw(),
            name: name.to_string(),
        })
    }

    /// Applies one property update message read from `reader`.
    ///
    /// Reads the format flag and the whole index list first, then decodes one
    /// value per listed slot with `decoder` and fires that slot's handlers.
    /// The first error aborts the rest of the message; slots dispatched before
    /// it keep their effects. An out-of-range slot index is reported before
    /// any value is decoded.
    pub fn apply_update<D>(
        &mut self,
        reader: &mut BitReader<'_>,
        decoder: &D,
        pool: &UpdateBufferPool,
    ) -> CodecResult<UpdateStats>
    where
        D: ValueDecoder<Value = V> + ?Sized,
    {
        let start = reader.bit_position();
        let mut indices = IndexDeltaDecoder::begin(reader)?;
        let mut changed = pool.acquire();

        while let Some(index) = indices.next_index(reader)? {
            if index >= self.properties.len() {
                return Err(CodecError::IndexOutOfRange {
                    entity_id: self.id.raw(),
                    index,
                    len: self.properties.len(),
                });
            }
            changed.push(index);
        }

        for &index in changed.iter() {
            let property = &mut self.properties[index];
            let value = decoder.decode(&property.entry, reader)?;
            property.fire_update(&value);
        }

        let stats = UpdateStats {
            wide: indices.is_wide(),
            changed: changed.len(),
            bits_read: reader.bit_position() - start,
        };
        pool.release(changed);

        trace!(
            entity = %self.id,
            class = %self.class.name,
            changed = stats.changed,
            bits = stats.bits_read,
            wide = stats.wide,
            "applied entity update"
        );
        Ok(stats)
    }
}

impl<V> fmt::Debug for Entity<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("class", &self.class.name)
            .field("properties", &self.properties)
            .finish()
    }
}
