//! Inspection and decoding tools for propdelta update messages.
//!
//! - Decode one update message against a class schema into slot/value pairs
//! - List the slot indices an update message touches
//! - Parse hex strings of update bytes
//!
//! Update bytes are read MSB-first within each byte.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use bitstream::BitReader;
use codec::{
    collect_properties, BasicValueDecoder, Entity, EntityId, IndexDeltaDecoder, PropertySnapshot,
    PropertyValue, UpdateBufferPool,
};
use schema::{class_fingerprint, ClassSchema};
use serde::Serialize;

/// Result of decoding one update message.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    pub class: String,
    pub class_fingerprint: String,
    pub entity_id: u32,
    pub wide: bool,
    pub bits_read: usize,
    pub bits_remaining: usize,
    pub changed: Vec<ChangedProperty>,
}

/// One property touched by an update.
#[derive(Debug, Clone, Serialize)]
pub struct ChangedProperty {
    pub slot: usize,
    pub name: String,
    pub kind: &'static str,
    pub value: PropertyValue,
}

/// Slot indices of one update message, without values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub wide: bool,
    pub indices: Vec<usize>,
    pub bits_read: usize,
}

/// Applies `bytes` as one update to a fresh entity of `class`.
pub fn decode_update(
    class: Arc<ClassSchema>,
    entity_id: u32,
    bytes: &[u8],
    pool: &UpdateBufferPool,
) -> Result<DecodeReport> {
    let fingerprint = class_fingerprint(&class);
    let mut entity = Entity::new(EntityId::new(entity_id), Arc::clone(&class));
    let snapshot = PropertySnapshot::new();
    collect_properties(&mut entity, &snapshot);

    let mut reader = BitReader::new(bytes);
    let stats = entity
        .apply_update(&mut reader, &BasicValueDecoder, pool)
        .with_context(|| format!("apply update to {} #{entity_id}", class.name))?;

    let changed = snapshot.with(|values| {
        values
            .iter()
            .map(|(&slot, value)| ChangedProperty {
                slot,
                name: class.properties[slot].name.clone(),
                kind: value.kind_name(),
                value: *value,
            })
            .collect()
    });

    Ok(DecodeReport {
        class: class.name.clone(),
        class_fingerprint: format!("0x{fingerprint:016x}"),
        entity_id,
        wide: stats.wide,
        bits_read: stats.bits_read,
        bits_remaining: reader.bits_remaining(),
        changed,
    })
}

/// Decodes only the format flag and index list of an update message.
pub fn decode_indices(bytes: &[u8]) -> Result<IndexReport> {
    let mut reader = BitReader::new(bytes);
    let mut decoder = IndexDeltaDecoder::begin(&mut reader).context("read format flag")?;
    let mut indices = Vec::new();
    while let Some(index) = decoder
        .next_index(&mut reader)
        .with_context(|| format!("read index after {:?}", decoder.last_index()))?
    {
        indices.push(index);
    }
    Ok(IndexReport {
        wide: decoder.is_wide(),
        indices,
        bits_read: reader.bit_position(),
    })
}

/// Parses a hex string, ignoring whitespace and an optional `0x` prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(digits).context("parse --hex")
}

/// Human-readable rendering of a decode report.
#[must_use]
pub fn format_decode_pretty(report: &DecodeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} #{} (schema {})",
        report.class, report.entity_id, report.class_fingerprint
    );
    let _ = writeln!(
        out,
        "format: {}  bits read: {}  bits left: {}",
        if report.wide { "wide" } else { "legacy" },
        report.bits_read,
        report.bits_remaining
    );
    let _ = writeln!(out, "changed: {}", report.changed.len());
    for property in &report.changed {
        let _ = writeln!(
            out,
            "  [{:>4}] {:<32} {:<8} {}",
            property.slot,
            property.name,
            property.kind,
            format_value(property.value)
        );
    }
    out
}

fn format_value(value: PropertyValue) -> String {
    match value {
        PropertyValue::Bool(v) => v.to_string(),
        PropertyValue::UInt(v) => v.to_string(),
        PropertyValue::SInt(v) => v.to_string(),
        PropertyValue::Float(v) => format!("{v:.3}"),
    }
}
