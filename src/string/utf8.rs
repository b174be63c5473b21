//! UTF-8 decoding helpers that tolerate malformed input
//!
//! Strings are byte buffers that are usually, but not necessarily, valid
//! UTF-8. These helpers walk a byte slice one unit at a time: a unit is either
//! a complete, valid codepoint or a single byte that does not start one.

use std::str;

/// Get the expected sequence length for a UTF-8 lead byte
///
/// Returns 0 for continuation bytes and bytes that never start a sequence.
#[inline]
pub fn utf8_byte_count(byte: u8) -> usize {
    static UTF8_BYTE_COUNT_LUT: [u8; 256] = {
        let mut table = [0u8; 256];
        let mut i = 0;
        while i < 256 {
            let byte = i as u8;
            table[i] = if byte < 0x80 {
                1
            } else if byte < 0xC0 {
                0 // continuation
            } else if byte < 0xE0 {
                2
            } else if byte < 0xF0 {
                3
            } else if byte < 0xF8 {
                4
            } else {
                0
            };
            i += 1;
        }
        table
    };

    UTF8_BYTE_COUNT_LUT[byte as usize] as usize
}

/// One decoded unit of a byte string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// A valid codepoint and its encoded length
    Char(char, usize),
    /// A byte that does not begin a valid sequence
    Invalid(u8),
}

impl Unit {
    /// Number of input bytes this unit covers
    #[inline]
    pub fn byte_len(&self) -> usize {
        match *self {
            Unit::Char(_, len) => len,
            Unit::Invalid(_) => 1,
        }
    }
}

/// Decode the unit starting at `pos`
///
/// Truncated sequences, bad continuation bytes, overlong forms and encoded
/// surrogates all yield [`Unit::Invalid`] for the lead byte only, so the caller
/// resynchronizes on the next byte.
#[inline]
pub fn decode_at(bytes: &[u8], pos: usize) -> Option<Unit> {
    let lead = *bytes.get(pos)?;
    if lead < 0x80 {
        return Some(Unit::Char(lead as char, 1));
    }
    let len = utf8_byte_count(lead);
    if len == 0 || pos + len > bytes.len() {
        return Some(Unit::Invalid(lead));
    }
    match str::from_utf8(&bytes[pos..pos + len]) {
        Ok(s) => Some(s.chars().next().map_or(Unit::Invalid(lead), |c| Unit::Char(c, len))),
        Err(_) => Some(Unit::Invalid(lead)),
    }
}

/// Iterator over the units of a byte slice
#[derive(Debug, Clone)]
pub struct Units<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Units<'a> {
    /// Iterate over `bytes` from the start
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Byte offset of the next unit
    #[inline]
    pub fn byte_position(&self) -> usize {
        self.pos
    }
}

impl Iterator for Units<'_> {
    type Item = Unit;

    #[inline]
    fn next(&mut self) -> Option<Unit> {
        let unit = decode_at(self.bytes, self.pos)?;
        self.pos += unit.byte_len();
        Some(unit)
    }
}

/// Count units (codepoints, with each malformed byte counted once)
pub fn count_units(bytes: &[u8]) -> usize {
    if bytes.is_ascii() {
        return bytes.len();
    }
    if let Ok(s) = str::from_utf8(bytes) {
        return s.chars().count();
    }
    Units::new(bytes).count()
}

/// Index of the unit containing byte offset `byte_pos`
///
/// Counts the units that end at or before `byte_pos`, so an offset inside a
/// multi-byte sequence maps to that sequence's index. Offsets at or past the
/// end yield the unit count.
pub fn unit_index(bytes: &[u8], byte_pos: usize) -> usize {
    let end = byte_pos.min(bytes.len());
    let mut pos = 0;
    let mut index = 0;
    while let Some(unit) = decode_at(bytes, pos) {
        if pos + unit.byte_len() > end {
            break;
        }
        pos += unit.byte_len();
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_byte_count() {
        assert_eq!(utf8_byte_count(b'A'), 1);
        assert_eq!(utf8_byte_count(0x80), 0);
        assert_eq!(utf8_byte_count(0xC3), 2);
        assert_eq!(utf8_byte_count(0xE6), 3);
        assert_eq!(utf8_byte_count(0xF0), 4);
        assert_eq!(utf8_byte_count(0xFF), 0);
    }

    #[test]
    fn test_decode_valid() {
        let s = "aÑ愛😀".as_bytes();
        let units: Vec<Unit> = Units::new(s).collect();
        assert_eq!(
            units,
            vec![
                Unit::Char('a', 1),
                Unit::Char('Ñ', 2),
                Unit::Char('愛', 3),
                Unit::Char('😀', 4)
            ]
        );

        let mut units = Units::new(s);
        units.next();
        units.next();
        assert_eq!(units.byte_position(), 3);
    }

    #[test]
    fn test_decode_malformed() {
        // truncated 3-byte sequence followed by ASCII
        assert_eq!(decode_at(&[0xE6, 0x84, b'x'], 0), Some(Unit::Invalid(0xE6)));
        // lone continuation
        assert_eq!(decode_at(&[0x84], 0), Some(Unit::Invalid(0x84)));
        // overlong encoding of '/'
        assert_eq!(decode_at(&[0xC0, 0xAF], 0), Some(Unit::Invalid(0xC0)));
        // encoded surrogate U+D800
        assert_eq!(decode_at(&[0xED, 0xA0, 0x80], 0), Some(Unit::Invalid(0xED)));
        assert_eq!(decode_at(&[], 0), None);
    }

    #[test]
    fn test_count_and_index() {
        let s = "aÑ愛b".as_bytes();
        assert_eq!(count_units(s), 4);
        assert_eq!(unit_index(s, 0), 0);
        assert_eq!(unit_index(s, 1), 1);
        assert_eq!(unit_index(s, 3), 2);
        assert_eq!(unit_index(s, 6), 3);
        assert_eq!(unit_index(s, 100), 4);
        // offsets inside a sequence map to the sequence itself
        assert_eq!(unit_index(s, 2), 1);
        assert_eq!(unit_index(s, 4), 2);
        assert_eq!(unit_index(s, 5), 2);

        let broken = [b'a', 0xE6, 0x84, b'b'];
        assert_eq!(count_units(&broken), 4);
    }
}
