//! Index-delta decoding of changed property slots.
//!
//! An update message starts with one flag bit selecting the wide index format,
//! followed by a list of slot indices. Each entry encodes the distance from the
//! previous index (or from -1 for the first one); the list ends with the raw
//! value [`INDEX_SENTINEL`].
//!
//! Per entry:
//!
//! ```text
//! wide:   1                      -> previous + 1
//!         0 1 ddd                -> raw = ddd (3 bits)
//!         0 0 rrrrrrr [ext]      -> raw = tiered 7-bit form
//! legacy: rrrrrrr [ext]          -> raw = tiered 7-bit form
//!
//! tiered: r & 0x60 == 0x00 -> raw = r
//!         r & 0x60 == 0x20 -> raw = (r & !0x60) | (read(2) << 5)
//!         r & 0x60 == 0x40 -> raw = (r & !0x60) | (read(4) << 5)
//!         r & 0x60 == 0x60 -> raw = (r & !0x60) | (read(7) << 5)
//!
//! raw == 0xFFF ends the list, otherwise index = previous + 1 + raw
//! ```

use bitstream::BitReader;

use crate::error::{CodecError, CodecResult};

/// Raw delta value that terminates an index list.
pub const INDEX_SENTINEL: u64 = 0xFFF;

const SHORT_DELTA_BITS: u8 = 3;
const BASE_DELTA_BITS: u8 = 7;
const TIER_MASK: u64 = 0b110_0000;
const TIER_SHIFT: u32 = 5;

/// Stateful decoder for one update's index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDeltaDecoder {
    wide: bool,
    last: Option<usize>,
    finished: bool,
}

impl IndexDeltaDecoder {
    /// Creates a decoder for an index list in the given format.
    #[must_use]
    pub const fn new(wide: bool) -> Self {
        Self {
            wide,
            last: None,
            finished: false,
        }
    }

    /// Reads the per-update format flag and creates a decoder for the list after it.
    pub fn begin(reader: &mut BitReader<'_>) -> CodecResult<Self> {
        Ok(Self::new(reader.read_bit()?))
    }

    /// Returns `true` if this update uses the wide index format.
    #[must_use]
    pub const fn is_wide(&self) -> bool {
        self.wide
    }

    /// Returns the most recently decoded index.
    #[must_use]
    pub const fn last_index(&self) -> Option<usize> {
        self.last
    }

    /// Returns `true` once the end marker has been read.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decodes the next slot index, or `None` at the end of the list.
    ///
    /// After the end marker every further call returns `None` without reading.
    pub fn next_index(&mut self, reader: &mut BitReader<'_>) -> CodecResult<Option<usize>> {
        if self.finished {
            return Ok(None);
        }
        let next = read_field_index(reader, self.last, self.wide)?;
        match next {
            Some(index) => self.last = Some(index),
            None => self.finished = true,
        }
        Ok(next)
    }
}

/// Decodes one entry of an index list relative to `last`.
///
/// Returns `None` when the entry is the end marker, and
/// [`CodecError::IndexOverflow`] if the decoded index does not fit in `usize`.
pub fn read_field_index(
    reader: &mut BitReader<'_>,
    last: Option<usize>,
    wide: bool,
) -> CodecResult<Option<usize>> {
    let overflow = |delta| CodecError::IndexOverflow {
        last: last.unwrap_or_default(),
        delta,
    };
    let base = match last {
        Some(last) => last.checked_add(1).ok_or_else(|| overflow(0))?,
        None => 0,
    };

    if wide && reader.read_bit()? {
        return Ok(Some(base));
    }

    let raw = if wide && reader.read_bit()? {
        reader.read_bits(SHORT_DELTA_BITS)?
    } else {
        let raw = reader.read_bits(BASE_DELTA_BITS)?;
        let ext_bits = match raw & TIER_MASK {
            0b010_0000 => 2,
            0b100_0000 => 4,
            0b110_0000 => 7,
            _ => 0,
        };
        if ext_bits == 0 {
            raw
        } else {
            (raw & !TIER_MASK) | (reader.read_bits(ext_bits)? << TIER_SHIFT)
        }
    };

    if raw == INDEX_SENTINEL {
        return Ok(None);
    }
    // raw is at most 12 bits wide
    base.checked_add(raw as usize)
        .map(Some)
        .ok_or_else(|| overflow(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitstream::BitWriter;

    fn bits(fields: &[(u64, u8)]) -> Vec<u8> {
        let mut writer = BitWriter::new();
        for &(value, width) in fields {
            writer.write_bits(value, width).unwrap();
        }
        writer.finish()
    }

    #[test]
    fn legacy_small_delta_reads_seven_bits() {
        let data = bits(&[(5, 7)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(read_field_index(&mut reader, None, false).unwrap(), Some(5));
        assert_eq!(reader.bit_position(), 7);
    }

    #[test]
    fn legacy_delta_is_relative_to_last() {
        let data = bits(&[(0, 7)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(
            read_field_index(&mut reader, Some(10), false).unwrap(),
            Some(11)
        );
    }

    #[test]
    fn tier_32_reads_two_extension_bits() {
        // r = 0b010_0011, ext = 0b10 -> (3) | (2 << 5) = 67
        let data = bits(&[(0b010_0011, 7), (0b10, 2)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(read_field_index(&mut reader, None, false).unwrap(), Some(67));
        assert_eq!(reader.bit_position(), 9);
    }

    #[test]
    fn tier_64_reads_four_extension_bits() {
        // r = 0b100_0001, ext = 0b1111 -> 1 | (15 << 5) = 481
        let data = bits(&[(0b100_0001, 7), (0b1111, 4)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(
            read_field_index(&mut reader, Some(0), false).unwrap(),
            Some(482)
        );
        assert_eq!(reader.bit_position(), 11);
    }

    #[test]
    fn tier_96_reads_seven_extension_bits() {
        // r = 0b110_1010, ext = 0b000_0011 -> 10 | (3 << 5) = 106
        let data = bits(&[(0b110_1010, 7), (0b000_0011, 7)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(
            read_field_index(&mut reader, None, false).unwrap(),
            Some(106)
        );
        assert_eq!(reader.bit_position(), 14);
    }

    #[test]
    fn sentinel_ends_list() {
        // 0xFFF = 0b1_1111 | (0x7F << 5): r = 0b111_1111, ext = 0b111_1111
        let data = bits(&[(0x7F, 7), (0x7F, 7)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(read_field_index(&mut reader, Some(3), false).unwrap(), None);
        assert_eq!(reader.bit_position(), 14);
    }

    #[test]
    fn wide_consecutive_fast_path() {
        let data = bits(&[(1, 1)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(read_field_index(&mut reader, None, true).unwrap(), Some(0));
        assert_eq!(reader.bit_position(), 1);

        let mut reader = BitReader::new(&data);
        assert_eq!(
            read_field_index(&mut reader, Some(41), true).unwrap(),
            Some(42)
        );
    }

    #[test]
    fn wide_short_delta_skips_tiers() {
        // 0 1 then 3-bit delta 0b110; no tier extension even though the value is small
        let data = bits(&[(0, 1), (1, 1), (0b110, 3)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(
            read_field_index(&mut reader, Some(1), true).unwrap(),
            Some(8)
        );
        assert_eq!(reader.bit_position(), 5);
    }

    #[test]
    fn wide_falls_back_to_tiered_form() {
        let data = bits(&[(0, 1), (0, 1), (0b010_0000, 7), (0b01, 2)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(read_field_index(&mut reader, None, true).unwrap(), Some(32));
        assert_eq!(reader.bit_position(), 11);
    }

    #[test]
    fn legacy_never_reads_wide_prefix_bits() {
        // A leading 1 bit would be the fast path in wide mode; in legacy mode it
        // is the top bit of the 7-bit delta (tier 96).
        let data = bits(&[(0b110_0000, 7), (0, 7)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(read_field_index(&mut reader, None, false).unwrap(), Some(0));
        assert_eq!(reader.bit_position(), 14);
    }

    #[test]
    fn decoder_sequence_from_zero_deltas() {
        // deltas [0, 0, 2] then the end marker
        let data = bits(&[(0, 7), (0, 7), (2, 7), (0x7F, 7), (0x7F, 7)]);
        let mut reader = BitReader::new(&data);
        let mut decoder = IndexDeltaDecoder::new(false);
        let mut out = Vec::new();
        while let Some(index) = decoder.next_index(&mut reader).unwrap() {
            out.push(index);
        }
        assert_eq!(out, vec![0, 1, 4]);
        assert!(decoder.is_finished());
        assert_eq!(decoder.last_index(), Some(4));
        assert!(reader.is_empty() || reader.bits_remaining() < 8);
    }

    #[test]
    fn decoder_stays_finished() {
        let data = bits(&[(0x7F, 7), (0x7F, 7), (0, 7)]);
        let mut reader = BitReader::new(&data);
        let mut decoder = IndexDeltaDecoder::new(false);
        assert_eq!(decoder.next_index(&mut reader).unwrap(), None);
        let position = reader.bit_position();
        assert_eq!(decoder.next_index(&mut reader).unwrap(), None);
        assert_eq!(reader.bit_position(), position);
    }

    #[test]
    fn begin_reads_format_flag() {
        let data = bits(&[(1, 1)]);
        let mut reader = BitReader::new(&data);
        let decoder = IndexDeltaDecoder::begin(&mut reader).unwrap();
        assert!(decoder.is_wide());
        assert_eq!(decoder.last_index(), None);
    }

    #[test]
    fn overflowing_last_index_is_an_error() {
        let data = bits(&[(1, 1)]);
        let mut reader = BitReader::new(&data);
        let err = read_field_index(&mut reader, Some(usize::MAX), true).unwrap_err();
        assert!(matches!(
            err,
            CodecError::IndexOverflow {
                last: usize::MAX,
                delta: 0
            }
        ));

        let data = bits(&[(5, 7)]);
        let mut reader = BitReader::new(&data);
        let err = read_field_index(&mut reader, Some(usize::MAX - 3), false).unwrap_err();
        assert!(matches!(err, CodecError::IndexOverflow { delta: 5, .. }));
    }

    #[test]
    fn truncated_extension_propagates_eof() {
        let data = bits(&[(0b110_0000, 7)]);
        let mut reader = BitReader::new(&data[..]);
        // one padding bit remains, the 7-bit extension cannot be read
        let err = read_field_index(&mut reader, None, false).unwrap_err();
        assert!(matches!(
            err,
            crate::CodecError::Bitstream(bitstream::BitError::UnexpectedEof { .. })
        ));
    }
}
