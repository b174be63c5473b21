//! Case conversion for byte strings
//!
//! Pure-ASCII strings are mapped in place through 256-entry tables built at
//! compile time. Anything else takes the Unicode path: each codepoint goes
//! through a simple (one codepoint to one codepoint) case mapping and is
//! re-encoded into a scratch buffer, because the mapped form may need a
//! different number of bytes (`ſ` is 2 bytes, its uppercase `S` is 1). The
//! scratch buffer then replaces the original contents.
//!
//! Malformed bytes are copied through unchanged, so conversion never fails on
//! content; the only error is allocation failure.

use super::str_buf::StrBuf;
use super::utf8::{decode_at, Unit, Units};
use crate::config::CaseConfig;
use crate::error::Result;

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseDirection {
    /// To lowercase
    Lower,
    /// To uppercase
    Upper,
}

const fn build_ascii_table(direction: CaseDirection) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = match direction {
            CaseDirection::Lower => b.to_ascii_lowercase(),
            CaseDirection::Upper => b.to_ascii_uppercase(),
        };
        i += 1;
    }
    table
}

static ASCII_LOWER: [u8; 256] = build_ascii_table(CaseDirection::Lower);
static ASCII_UPPER: [u8; 256] = build_ascii_table(CaseDirection::Upper);

#[inline]
fn ascii_table(direction: CaseDirection) -> &'static [u8; 256] {
    match direction {
        CaseDirection::Lower => &ASCII_LOWER,
        CaseDirection::Upper => &ASCII_UPPER,
    }
}

/// Simple case mapping of one codepoint
///
/// Mappings that expand to several codepoints (`ß` to `SS`, `İ` to `i̇`) are
/// not simple mappings; such codepoints are returned unchanged.
#[inline]
pub fn map_char(c: char, direction: CaseDirection) -> char {
    if c.is_ascii() {
        return ascii_table(direction)[c as usize] as char;
    }
    match direction {
        CaseDirection::Lower => single(c.to_lowercase()).unwrap_or(c),
        CaseDirection::Upper => single(c.to_uppercase()).unwrap_or(c),
    }
}

#[inline]
fn single<I: Iterator<Item = char>>(mut mapped: I) -> Option<char> {
    let first = mapped.next()?;
    match mapped.next() {
        None => Some(first),
        Some(_) => None,
    }
}

/// Case-conversion engine
///
/// # Examples
///
/// ```rust
/// use srtlib::{CaseMapper, StrBuf};
///
/// let mapper = CaseMapper::new();
/// let mut s = StrBuf::from_text("ſtraße ⱥ").unwrap();
/// mapper.to_upper(&mut s).unwrap();
/// assert_eq!(s.as_str(), Some("STRAßE Ⱥ"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseMapper {
    config: CaseConfig,
}

impl CaseMapper {
    /// Create a mapper with the default configuration
    pub const fn new() -> Self {
        Self {
            config: CaseConfig::DEFAULT,
        }
    }

    /// Create a mapper with an explicit configuration
    pub fn with_config(config: CaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &CaseConfig {
        &self.config
    }

    /// Convert `s` to lowercase in place
    pub fn to_lower(&self, s: &mut StrBuf) -> Result<()> {
        self.convert(s, CaseDirection::Lower)
    }

    /// Convert `s` to uppercase in place
    pub fn to_upper(&self, s: &mut StrBuf) -> Result<()> {
        self.convert(s, CaseDirection::Upper)
    }

    /// Convert `s` in the given direction
    pub fn convert(&self, s: &mut StrBuf, direction: CaseDirection) -> Result<()> {
        if s.as_bytes().is_ascii() {
            let table = ascii_table(direction);
            for b in s.as_bytes_mut() {
                *b = table[*b as usize];
            }
            return Ok(());
        }

        log::trace!("unicode case path: {} bytes, {:?}", s.len(), direction);
        let mut scratch = StrBuf::with_policy(self.config.scratch_capacity(s.len()), s.policy())?;
        map_into(s.as_bytes(), &mut scratch, direction)?;
        s.swap(&mut scratch);
        Ok(())
    }
}

/// Map `src` codepoint by codepoint, appending the result to `dst`
fn map_into(src: &[u8], dst: &mut StrBuf, direction: CaseDirection) -> Result<()> {
    let table = ascii_table(direction);
    let mut pos = 0;
    while pos < src.len() {
        // ASCII runs are mapped through the table in one append
        let run = src[pos..].iter().take_while(|b| b.is_ascii()).count();
        if run > 0 {
            let start = dst.len();
            dst.append(&src[pos..pos + run])?;
            for b in &mut dst.as_bytes_mut()[start..] {
                *b = table[*b as usize];
            }
            pos += run;
            continue;
        }

        match decode_at(src, pos) {
            Some(Unit::Char(c, len)) => {
                dst.push_char(map_char(c, direction))?;
                pos += len;
            }
            Some(Unit::Invalid(b)) => {
                dst.push_byte(b)?;
                pos += 1;
            }
            None => break,
        }
    }
    Ok(())
}

/// Compare two byte strings ignoring case, using simple lowercase folding
pub fn eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    let fold = |u: Unit| match u {
        Unit::Char(c, _) => Ok(map_char(c, CaseDirection::Lower)),
        Unit::Invalid(byte) => Err(byte),
    };
    Units::new(a).map(fold).eq(Units::new(b).map(fold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::utf8::count_units;

    fn lower(text: &str) -> StrBuf {
        let mut s = StrBuf::from_text(text).unwrap();
        CaseMapper::new().to_lower(&mut s).unwrap();
        s
    }

    fn upper(text: &str) -> StrBuf {
        let mut s = StrBuf::from_text(text).unwrap();
        CaseMapper::new().to_upper(&mut s).unwrap();
        s
    }

    #[test]
    fn test_ascii_tables() {
        assert_eq!(ASCII_LOWER[b'A' as usize], b'a');
        assert_eq!(ASCII_UPPER[b'z' as usize], b'Z');
        assert_eq!(ASCII_LOWER[b'@' as usize], b'@');
        assert_eq!(ASCII_UPPER[0xC3], 0xC3);
    }

    #[test]
    fn test_ascii_in_place() {
        let s = upper("Hello, World 123!");
        assert_eq!(s.as_str(), Some("HELLO, WORLD 123!"));
        let s = lower("Hello, World 123!");
        assert_eq!(s.as_str(), Some("hello, world 123!"));
    }

    #[test]
    fn test_length_changing_mappings() {
        // 2 bytes -> 1 byte
        let s = upper("ſ");
        assert_eq!(s.as_str(), Some("S"));
        let s = upper("ı");
        assert_eq!(s.as_str(), Some("I"));
        // 3 bytes -> 2 bytes
        let s = upper("ⱥ");
        assert_eq!(s.as_str(), Some("Ⱥ"));
        // 2 bytes -> 3 bytes
        let s = lower("Ⱥ");
        assert_eq!(s.as_str(), Some("ⱥ"));
    }

    #[test]
    fn test_multi_codepoint_mappings_unchanged() {
        assert_eq!(upper("ß").as_str(), Some("ß"));
        assert_eq!(lower("İ").as_str(), Some("İ"));
    }

    #[test]
    fn test_codepoint_count_preserved() {
        let text = "Ñandú ſtraße ΣΑΣ ⱥⱦ İı 愛 Ǆǅǆ";
        let chars = text.chars().count();
        let l = lower(text);
        let u = upper(text);
        assert_eq!(count_units(l.as_bytes()), chars);
        assert_eq!(count_units(u.as_bytes()), chars);
    }

    #[test]
    fn test_malformed_bytes_pass_through() {
        let mut s = StrBuf::from_bytes(&[b'a', 0xE6, 0x84, b'B', 0xFF, 0xC3, 0xB1]).unwrap();
        CaseMapper::new().to_upper(&mut s).unwrap();
        assert_eq!(s.as_bytes(), &[b'A', 0xE6, 0x84, b'B', 0xFF, 0xC3, 0x91]);
        CaseMapper::new().to_lower(&mut s).unwrap();
        assert_eq!(s.as_bytes(), &[b'a', 0xE6, 0x84, b'b', 0xFF, 0xC3, 0xB1]);
    }

    #[test]
    fn test_zero_slack_still_grows() {
        let mapper = CaseMapper::with_config(CaseConfig { scratch_slack_percent: 0 }).unwrap();
        // every codepoint grows from 2 to 3 bytes
        let mut s = StrBuf::from_text(&"Ⱥ".repeat(100)).unwrap();
        mapper.to_lower(&mut s).unwrap();
        assert_eq!(s.len(), 300);
        assert_eq!(s.as_str(), Some("ⱥ".repeat(100).as_str()));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(CaseMapper::with_config(CaseConfig { scratch_slack_percent: 1000 }).is_err());
    }

    #[test]
    fn test_eq_ignore_case() {
        assert!(eq_ignore_case(b"Hello", b"hELLO"));
        assert!(!eq_ignore_case(b"Hello", b"Help!"));
        assert!(eq_ignore_case("ÑANDÚ".as_bytes(), "ñandú".as_bytes()));
        // simple lowercase folding keeps long s distinct from s
        assert!(!eq_ignore_case("ſ".as_bytes(), "S".as_bytes()));
        assert!(eq_ignore_case(&[0xFF, b'A'], &[0xFF, b'a']));
        assert!(!eq_ignore_case(&[0xFE, b'A'], &[0xFF, b'a']));
        assert!(!eq_ignore_case("añ".as_bytes(), "a".as_bytes()));
    }
}
