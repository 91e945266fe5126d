//! Deterministic class schema fingerprints.

use blake3::Hasher;

use crate::{ClassSchema, PropertyKind};

/// Computes a deterministic fingerprint of a class schema.
///
/// Two schemas with the same class id, name, slot order, property names and
/// kinds always hash to the same value, so a schema file can be checked
/// against the one a capture was recorded with.
#[must_use]
pub fn class_fingerprint(schema: &ClassSchema) -> u64 {
    let mut hasher = Hasher::new();
    write_u32(&mut hasher, schema.id);
    write_str(&mut hasher, &schema.name);
    write_u32(&mut hasher, schema.properties.len() as u32);

    for property in &schema.properties {
        write_str(&mut hasher, &property.name);
        write_kind(&mut hasher, property.kind);
    }

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

fn write_kind(hasher: &mut Hasher, kind: PropertyKind) {
    match kind {
        PropertyKind::Bool => {
            write_u8(hasher, 0);
        }
        PropertyKind::UInt { bits } => {
            write_u8(hasher, 1);
            write_u8(hasher, bits);
        }
        PropertyKind::SInt { bits } => {
            write_u8(hasher, 2);
            write_u8(hasher, bits);
        }
        PropertyKind::Float32 => {
            write_u8(hasher, 3);
        }
    }
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}
