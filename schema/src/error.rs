//! Schema validation errors.

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors reported by [`ClassSchema::validate`](crate::ClassSchema::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two properties of one class share a name.
    #[error("class {class:?}: property name {name:?} is used by slots {first} and {second}")]
    DuplicatePropertyName {
        class: String,
        name: String,
        first: usize,
        second: usize,
    },

    /// Invalid bit width for fixed-width integers.
    #[error("property {name:?}: invalid bit width {bits}")]
    InvalidBitWidth { name: String, bits: u8 },

    /// The class has so many properties that a slot index can equal the
    /// end-of-list marker.
    #[error("class {class:?} has {count} properties; slot indices collide with the end marker at {sentinel}")]
    SentinelCollision {
        class: String,
        count: usize,
        sentinel: usize,
    },
}
