//! Flattened entity class schemas for propdelta.
//!
//! A class schema is the ordered list of properties an entity class exposes
//! after its nested property tables have been flattened. The position of a
//! property in that list is its slot index, which is what update messages
//! address.
//!
//! # Design Principles
//!
//! - **Immutable once built** - Schemas are shared by every entity of a class.
//! - **Order is identity** - Slot indices never change after construction.
//! - **Deterministic hashing** - Fingerprints are stable given the same definition.

mod class;
mod error;
mod hash;
mod property;

pub use class::{ClassSchema, ClassSchemaBuilder};
pub use error::{SchemaError, SchemaResult};
pub use hash::class_fingerprint;
pub use property::{PropertyDef, PropertyKind};

/// Number of slots a class can address before a slot index equals the
/// end-of-index-list marker (`0xFFF`).
pub const MAX_CLASS_PROPERTIES: usize = 0xFFF;
