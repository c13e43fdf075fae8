//! # Datagram encoding
//!
//! A [`Datagram`] is an append-only byte buffer. A [`DatagramIterator`] reads one back.
//!
//! All multi-byte values are little-endian. Counts and lengths are written at a declared width;
//! a value that does not fit that width is a [`crate::error::BamError::Range`].
//!
//! ```text
//! u8, i8, bool:       [u8; 1]             // bool is 0 or 1
//! u16, i16:           [u8; 2]
//! u32, i32:           [u8; 4]
//! stdfloat:           [u8; 4]             // f32
//! vec3:               [stdfloat; 3]
//! vec4:               [stdfloat; 4]
//!
//! struct String {
//!     len:        u16,
//!     bytes:      [u8; len],              // UTF-8
//! }
//!
//! struct Blob {
//!     len:        u32,
//!     bytes:      [u8; len],
//! }
//! ```

mod datagram_writer;
mod datagram_iterator;
mod lengths;

pub use datagram_writer::*;
pub use datagram_iterator::*;
pub use lengths::*;
