//! Bounded formatted writes into a [`StrBuf`]

use super::str_buf::StrBuf;
use crate::error::{Result, SrtError};
use std::fmt::{self, Write};

/// `fmt::Write` adaptor that stops accepting bytes at a limit
struct Bounded<'a> {
    dst: &'a mut StrBuf,
    remaining: usize,
    error: Option<SrtError>,
}

impl Write for Bounded<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.remaining == 0 {
            return Ok(());
        }
        let mut take = s.len().min(self.remaining);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        if let Err(e) = self.dst.append_str(&s[..take]) {
            self.error = Some(e);
            return Err(fmt::Error);
        }
        // a split codepoint ends the output
        self.remaining = if take < s.len() { 0 } else { self.remaining - take };
        Ok(())
    }
}

impl StrBuf {
    /// Overwrite the contents with formatted output, keeping at most
    /// `max_bytes` bytes
    ///
    /// Truncation never splits a UTF-8 sequence. Returns the number of bytes
    /// written. Usually called through [`format_into!`](crate::format_into).
    ///
    /// ```rust
    /// use srtlib::StrBuf;
    ///
    /// let mut s = StrBuf::new();
    /// let n = s.formatted_write(64, format_args!("{:016}", 42)).unwrap();
    /// assert_eq!(n, 16);
    /// assert_eq!(s, "0000000000000042");
    ///
    /// s.formatted_write(4, format_args!("{}", "abcdef")).unwrap();
    /// assert_eq!(s, "abcd");
    /// ```
    pub fn formatted_write(&mut self, max_bytes: usize, args: fmt::Arguments<'_>) -> Result<usize> {
        self.clear();
        if let Some(literal) = args.as_str() {
            let mut take = literal.len().min(max_bytes);
            while !literal.is_char_boundary(take) {
                take -= 1;
            }
            self.append_str(&literal[..take])?;
            return Ok(take);
        }

        let mut writer = Bounded {
            dst: self,
            remaining: max_bytes,
            error: None,
        };
        if writer.write_fmt(args).is_err() {
            let error = writer.error.take();
            // never leave a partial result behind
            self.clear();
            return Err(error
                .unwrap_or_else(|| SrtError::invalid_data("formatting trait implementation returned an error")));
        }
        Ok(self.len())
    }
}

/// Format into a [`StrBuf`] with a byte limit
///
/// `format_into!(dst, max_bytes, "fmt", args...)` expands to
/// [`StrBuf::formatted_write`].
///
/// ```rust
/// use srtlib::{format_into, StrBuf};
///
/// let mut key = StrBuf::new();
/// format_into!(key, 64, "{:016}", 7).unwrap();
/// assert_eq!(key, "0000000000000007");
/// ```
#[macro_export]
macro_rules! format_into {
    ($dst:expr, $max:expr, $($arg:tt)*) => {
        $dst.formatted_write($max, ::std::format_args!($($arg)*))
    };
}
