//! Builders for update messages used by the integration tests.

#![allow(dead_code)]

use bitstream::BitWriter;

pub const SENTINEL: u64 = 0xFFF;

/// Writes `raw` (at most 0xFFF) in the tiered 7-bit form using the narrowest tier.
pub fn write_tiered(writer: &mut BitWriter, raw: u64) {
    assert!(raw <= SENTINEL);
    let low = raw & 0x1F;
    let high = raw >> 5;
    match raw {
        0..=31 => writer.write_bits(raw, 7).unwrap(),
        32..=127 => {
            writer.write_bits(low | 0x20, 7).unwrap();
            writer.write_bits(high, 2).unwrap();
        }
        128..=511 => {
            writer.write_bits(low | 0x40, 7).unwrap();
            writer.write_bits(high, 4).unwrap();
        }
        _ => {
            writer.write_bits(low | 0x60, 7).unwrap();
            writer.write_bits(high, 7).unwrap();
        }
    }
}

/// Writes one index-list entry for a raw delta.
pub fn write_delta(writer: &mut BitWriter, raw: u64, wide: bool) {
    if !wide {
        write_tiered(writer, raw);
        return;
    }
    if raw == 0 {
        writer.write_bit(true);
        return;
    }
    writer.write_bit(false);
    if raw < 8 {
        writer.write_bit(true);
        writer.write_bits(raw, 3).unwrap();
    } else {
        writer.write_bit(false);
        write_tiered(writer, raw);
    }
}

/// Writes the format flag and the full index list for strictly increasing `slots`.
pub fn write_index_list(writer: &mut BitWriter, slots: &[usize], wide: bool) {
    writer.write_bit(wide);
    let mut last: Option<usize> = None;
    for &slot in slots {
        let base = last.map_or(0, |last| last + 1);
        assert!(slot >= base, "slots must be strictly increasing");
        write_delta(writer, (slot - base) as u64, wide);
        last = Some(slot);
    }
    if wide {
        writer.write_bit(false);
        writer.write_bit(false);
    }
    write_tiered(writer, SENTINEL);
}

/// Builds a full update: index list followed by one `bits`-wide value per slot.
pub fn update_message(slots: &[usize], values: &[u64], bits: u8, wide: bool) -> Vec<u8> {
    assert_eq!(slots.len(), values.len());
    let mut writer = BitWriter::new();
    write_index_list(&mut writer, slots, wide);
    for &value in values {
        writer.write_bits(value, bits).unwrap();
    }
    writer.finish()
}
