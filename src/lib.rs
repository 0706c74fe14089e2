//! Dual-cursor byte buffer for protocol encoders and decoders.
//!
//! [`OffsetBuffer`] pairs a fixed-length byte storage with two independent
//! cursors, one advanced by reads and one by writes, so codec code can say
//! "read the next 3-byte unsigned big-endian integer" without tracking
//! offsets by hand. It provides:
//!
//! * Fixed-width integer codecs for 8/16/24/32/64-bit widths, signed and
//!   unsigned, in both byte orders. 64-bit values cross the API boundary as
//!   exact decimal strings, a contract kept for callers whose numeric type
//!   cannot represent the full 64-bit range.
//! * Fill and copy primitives that keep the cursors consistent.
//! * Text conversions under a small set of schemes ([`TextEncoding`]).
//!
//! Every fallible operation validates before mutating, so a returned
//! [`Error`] guarantees the storage and both cursors are untouched.

mod buffer;
mod error;
pub mod int24;
pub mod text;

pub use buffer::OffsetBuffer;
pub use error::{Error, Result};
pub use text::TextEncoding;
