//! Property value decoding.

use bitstream::BitReader;
use schema::{PropertyDef, PropertyKind};

use crate::error::{CodecError, CodecResult, ValueReason};

/// Decodes one property's new value from the value list of an update.
///
/// Implementations must consume exactly the bits belonging to that property,
/// since the next property's value follows immediately.
pub trait ValueDecoder {
    /// The decoded value handed to update handlers.
    type Value;

    /// Decodes the value for `property` at the reader's current position.
    fn decode(&self, property: &PropertyDef, reader: &mut BitReader<'_>)
        -> CodecResult<Self::Value>;
}

/// A decoded property value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    Bool(bool),
    UInt(u64),
    SInt(i64),
    Float(f32),
}

impl PropertyValue {
    /// Short, stable name of the value's variant.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::UInt(_) => "uint",
            Self::SInt(_) => "sint",
            Self::Float(_) => "float32",
        }
    }
}

/// Fixed-width decoder for the [`PropertyKind`]s of a schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicValueDecoder;

impl ValueDecoder for BasicValueDecoder {
    type Value = PropertyValue;

    fn decode(
        &self,
        property: &PropertyDef,
        reader: &mut BitReader<'_>,
    ) -> CodecResult<PropertyValue> {
        let value = match property.kind {
            PropertyKind::Bool => PropertyValue::Bool(reader.read_bit()?),
            PropertyKind::UInt { bits } => {
                ensure_width(property, bits)?;
                PropertyValue::UInt(reader.read_bits(bits)?)
            }
            PropertyKind::SInt { bits } => {
                ensure_width(property, bits)?;
                PropertyValue::SInt(sign_extend(reader.read_bits(bits)?, bits))
            }
            PropertyKind::Float32 => {
                let raw = reader.read_bits(32)? as u32;
                PropertyValue::Float(f32::from_bits(raw))
            }
        };
        Ok(value)
    }
}

fn ensure_width(property: &PropertyDef, bits: u8) -> CodecResult<()> {
    if bits == 0 || bits > 64 {
        return Err(CodecError::InvalidValue {
            property: property.name.clone(),
            reason: ValueReason::InvalidBitWidth { bits },
        });
    }
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
fn sign_extend(raw: u64, bits: u8) -> i64 {
    let shift = 64 - u32::from(bits);
    ((raw << shift) as i64) >> shift
}
