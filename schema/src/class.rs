//! Flattened class schemas.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{SchemaError, SchemaResult};
use crate::{PropertyDef, PropertyKind, MAX_CLASS_PROPERTIES};

/// The ordered, flattened property list of one entity class.
///
/// Built once when the class is first seen and then shared (usually behind an
/// `Arc`) by every entity of that class. Construction does not reject
/// duplicate names; lookups by name report them, and [`validate`](Self::validate)
/// can be used to check a schema up front.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassSchema {
    pub id: u32,
    pub name: String,
    pub properties: Vec<Arc<PropertyDef>>,
}

impl ClassSchema {
    /// Creates a class schema from already flattened properties.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, properties: Vec<PropertyDef>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: properties.into_iter().map(Arc::new).collect(),
        }
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder(id: u32, name: impl Into<String>) -> ClassSchemaBuilder {
        ClassSchemaBuilder {
            id,
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Number of property slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the class has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns the property at `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Arc<PropertyDef>> {
        self.properties.get(slot)
    }

    /// Iterates properties in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PropertyDef>> {
        self.properties.iter()
    }

    /// Returns `true` when the class is large enough for slot indices to reach
    /// the end-marker value.
    ///
    /// The flag is raised from 4095 properties on. The first slot that is
    /// actually affected is slot 4095 (classes of 4096 or more): it can never be
    /// the first changed slot of an update, since reaching it from the start of
    /// the list takes the raw delta `0xFFF`.
    #[must_use]
    pub fn collides_with_sentinel(&self) -> bool {
        self.properties.len() >= MAX_CLASS_PROPERTIES
    }

    /// Validates schema invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.collides_with_sentinel() {
            return Err(SchemaError::SentinelCollision {
                class: self.name.clone(),
                count: self.properties.len(),
                sentinel: MAX_CLASS_PROPERTIES,
            });
        }

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(self.properties.len());
        for (slot, property) in self.properties.iter().enumerate() {
            if let Some(&first) = seen.get(property.name.as_str()) {
                return Err(SchemaError::DuplicatePropertyName {
                    class: self.name.clone(),
                    name: property.name.clone(),
                    first,
                    second: slot,
                });
            }
            seen.insert(&property.name, slot);
            validate_kind(property)?;
        }
        Ok(())
    }
}

/// Builder for `ClassSchema`.
#[derive(Debug)]
pub struct ClassSchemaBuilder {
    id: u32,
    name: String,
    properties: Vec<PropertyDef>,
}

impl ClassSchemaBuilder {
    /// Appends a property in the next slot.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.properties.push(PropertyDef::new(name, kind));
        self
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<ClassSchema> {
        let schema = self.build_unchecked();
        schema.validate()?;
        Ok(schema)
    }

    /// Builds the schema without validation.
    #[must_use]
    pub fn build_unchecked(self) -> ClassSchema {
        ClassSchema::new(self.id, self.name, self.properties)
    }
}

fn validate_kind(property: &PropertyDef) -> SchemaResult<()> {
    match property.kind {
        PropertyKind::UInt { bits } | PropertyKind::SInt { bits } => {
            if bits == 0 || bits > 64 {
                return Err(SchemaError::InvalidBitWidth {
                    name: property.name.clone(),
                    bits,
                });
            }
        }
        PropertyKind::Bool | PropertyKind::Float32 => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_slot_order() {
        let schema = ClassSchema::builder(7, "CCSPlayer")
            .property("m_iHealth", PropertyKind::uint(8))
            .property("m_ArmorValue", PropertyKind::uint(8))
            .property("m_bHasHelmet", PropertyKind::bool())
            .build()
            .unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.get(1).unwrap().name, "m_ArmorValue");
        assert!(schema.get(3).is_none());
    }

    #[test]
    fn duplicate_names_are_accepted_unchecked() {
        let schema = ClassSchema::builder(1, "CDup")
            .property("m_x", PropertyKind::bool())
            .property("m_x", PropertyKind::bool())
            .build_unchecked();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let err = ClassSchema::builder(1, "CDup")
            .property("m_x", PropertyKind::bool())
            .property("m_y", PropertyKind::bool())
            .property("m_x", PropertyKind::uint(3))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicatePropertyName {
                class: "CDup".to_string(),
                name: "m_x".to_string(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn validate_rejects_invalid_bit_width() {
        let err = ClassSchema::builder(1, "CBad")
            .property("m_zero", PropertyKind::uint(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBitWidth { bits: 0, .. }));

        let err = ClassSchema::builder(1, "CBad")
            .property("m_wide", PropertyKind::sint(65))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBitWidth { bits: 65, .. }));
    }

    #[test]
    fn validate_flags_sentinel_collision() {
        let properties = (0..MAX_CLASS_PROPERTIES)
            .map(|i| PropertyDef::new(format!("m_p{i}"), PropertyKind::bool()))
            .collect();
        let schema = ClassSchema::new(9, "CHuge", properties);
        assert!(schema.collides_with_sentinel());
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::SentinelCollision { count: 4095, .. })
        ));
    }

    #[test]
    fn largest_safe_class_validates() {
        let properties = (0..MAX_CLASS_PROPERTIES - 1)
            .map(|i| PropertyDef::new(format!("m_p{i}"), PropertyKind::bool()))
            .collect();
        let schema = ClassSchema::new(9, "CLarge", properties);
        assert!(!schema.collides_with_sentinel());
        schema.validate().unwrap();
    }
}
