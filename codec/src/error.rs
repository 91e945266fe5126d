//! Error types for update decoding and dispatch.

use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding an update or looking up a property.
///
/// None of these are recoverable inside an update: the first error aborts the
/// rest of the message. Properties dispatched before the failure stay applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The bit reader ran out of data or was misused.
    #[error(transparent)]
    Bitstream(#[from] bitstream::BitError),

    /// Named lookup found no property with this name.
    #[error("entity {entity_id}: no property named {name:?}")]
    PropertyNotFound { entity_id: u32, name: String },

    /// Named lookup found more than one property with this name.
    #[error("entity {entity_id}: property name {name:?} is used by slots {first} and {second}")]
    DuplicatePropertyName {
        entity_id: u32,
        name: String,
        first: usize,
        second: usize,
    },

    /// A decoded slot index is outside the entity's property table.
    #[error("entity {entity_id}: decoded slot index {index} out of range for {len} properties")]
    IndexOutOfRange {
        entity_id: u32,
        index: usize,
        len: usize,
    },

    /// A caller-supplied previous index leaves no room for the next one.
    #[error("slot index overflow after index {last} with delta {delta}")]
    IndexOverflow { last: usize, delta: u64 },
    /// A property definition cannot be decoded by the value decoder.
    #[error("property {property:?}: {reason}")]
    InvalidValue {
        property: String,
        reason: ValueReason,
    },
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValueReason {
    /// Integer width outside `1..=64`.
    #[error("integer width {bits} is outside 1..=64")]
    InvalidBitWidth { bits: u8 },
}

/// Broad classes of failure, for callers that log or abort differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Schema or caller defect: the code or schema is wrong, the data may be fine.
    Defect,
    /// The stream does not match the schema or is truncated.
    Corruption,
}

impl CodecError {
    /// Returns the broad category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::PropertyNotFound { .. }
            | Self::DuplicatePropertyName { .. }
            | Self::IndexOverflow { .. }
            | Self::InvalidValue { .. } => ErrorCategory::Defect,
            Self::Bitstream(_) | Self::IndexOutOfRange { .. } => ErrorCategory::Corruption,
        }
    }

    /// Returns `true` for schema or caller defects.
    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self.category(), ErrorCategory::Defect)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Defect => "defect",
            Self::Corruption => "corruption",
        };
        write!(f, "{name}")
    }
}
