//! Vector containers
//!
//! - **`FastVec<T>`** - typed growable vector (integers of any width or
//!   fixed-size records)
//! - **`RecordVec`** - vector of opaque records whose width is chosen at run time
//!
//! Both share the [`RawBuf`](crate::memory::RawBuf) growth implementation.

mod fast_vec;
mod record_vec;

pub use fast_vec::FastVec;
pub use record_vec::RecordVec;
