//! String value and text utilities
//!
//! - [`StrBuf`]: owned growable byte string on the shared buffer primitive
//! - [`CaseMapper`]: ASCII fast path and simple Unicode case mapping
//! - [`utf8`]: malformed-tolerant UTF-8 decoding helpers
//! - [`format_into!`](crate::format_into): bounded formatted writes

pub mod case;
mod format;
mod str_buf;
pub mod utf8;

pub use case::{eq_ignore_case, CaseDirection, CaseMapper};
pub use str_buf::StrBuf;
pub use utf8::utf8_byte_count;
