//! Property definitions and their decode parameters.

/// How a property's value is laid out in the value list of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum PropertyKind {
    /// Boolean (1 bit).
    Bool,

    /// Unsigned integer with fixed bit width.
    #[cfg_attr(feature = "serde", serde(rename = "uint"))]
    UInt { bits: u8 },

    /// Two's complement signed integer with fixed bit width.
    #[cfg_attr(feature = "serde", serde(rename = "sint"))]
    SInt { bits: u8 },

    /// IEEE-754 single precision float, 32 raw bits.
    Float32,
}

impl PropertyKind {
    /// Creates a boolean property kind.
    #[must_use]
    pub const fn bool() -> Self {
        Self::Bool
    }

    /// Creates an unsigned integer property kind.
    #[must_use]
    pub const fn uint(bits: u8) -> Self {
        Self::UInt { bits }
    }

    /// Creates a signed integer property kind.
    #[must_use]
    pub const fn sint(bits: u8) -> Self {
        Self::SInt { bits }
    }

    /// Creates a float property kind.
    #[must_use]
    pub const fn float32() -> Self {
        Self::Float32
    }

    /// Number of bits a value of this kind occupies on the wire.
    #[must_use]
    pub const fn bit_width(self) -> u8 {
        match self {
            Self::Bool => 1,
            Self::UInt { bits } | Self::SInt { bits } => bits,
            Self::Float32 => 32,
        }
    }

    /// Short, stable name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::UInt { .. } => "uint",
            Self::SInt { .. } => "sint",
            Self::Float32 => "float32",
        }
    }
}

/// One flattened property of an entity class.
///
/// Its position inside [`ClassSchema::properties`](crate::ClassSchema) is its
/// slot index and is fixed once the class is defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertyDef {
    /// Creates a property definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
